use std::env;
use std::process::exit;

use pkgtask::utils::TaskError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    if let Err(e) = pkgtask::run(env::args().skip(1).collect()) {
        match e {
            TaskError::Ok => {
                // Do nothing on Ok
            }
            TaskError::Args(ref err) => {
                let _ = err.print();
                exit(e.exit_code());
            }
            _ => {
                log::error!("{}", e);
                exit(e.exit_code());
            }
        }
    }
}
