use std::{env, fs, path::Path};

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dst = Path::new(&out_dir).join("generated_tasks.rs");
    let mut mods = String::new();

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let plugins_dir = Path::new(&manifest_dir).join("src/plugins");

    // Collect all plugin modules, sorted so `help` output is stable
    let mut plugins = Vec::new();
    for entry in fs::read_dir(&plugins_dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().map(|e| e == "rs").unwrap_or(false) {
            let mod_name = path.file_stem().unwrap().to_string_lossy().to_string();
            let abs_path = path.canonicalize().unwrap();
            plugins.push((mod_name, abs_path.to_string_lossy().replace('\\', "/")));
        }
    }
    plugins.sort();

    for (mod_name, path_str) in &plugins {
        mods.push_str(&format!(
            "#[path = \"{}\"]\npub mod {};\n",
            path_str, mod_name
        ));
    }

    mods.push('\n');
    mods.push_str("/// Auto-generated task lookup\n");
    mods.push_str(
        "pub fn fetch_task(task: &str, args: &[String], cfg: &crate::config::Config) -> crate::utils::TaskResult<Box<dyn TaskPlugin>> {\n",
    );
    mods.push_str("    match task {\n");
    for (plugin_name, _) in &plugins {
        mods.push_str(&format!(
            "        \"{}\" => Ok(Box::new(<{}::TaskInstance as TaskPlugin>::new(args, cfg)?)),\n",
            plugin_name, plugin_name
        ));
    }
    mods.push_str("        _ => Err(crate::utils::TaskError::TaskNotFound(task.to_string())),\n");
    mods.push_str("    }\n");
    mods.push_str("}\n");

    mods.push('\n');
    mods.push_str("/// Registered task names\n");
    mods.push_str("pub fn list_tasks() -> Vec<&'static str> {\n");
    mods.push_str("    vec![\n");
    for (plugin_name, _) in &plugins {
        mods.push_str(&format!("        \"{}\",\n", plugin_name));
    }
    mods.push_str("    ]\n");
    mods.push_str("}\n");

    mods.push('\n');
    mods.push_str("/// One-line task descriptions\n");
    mods.push_str("pub fn task_descriptions(task: &str) -> &'static str {\n");
    mods.push_str("    match task {\n");
    for (plugin_name, _) in &plugins {
        mods.push_str(&format!(
            "        \"{}\" => <{}::TaskInstance as TaskPlugin>::description(),\n",
            plugin_name, plugin_name
        ));
    }
    mods.push_str("        _ => \"Unknown task\",\n");
    mods.push_str("    }\n");
    mods.push_str("}\n");

    fs::write(&dst, mods).unwrap();
    println!("cargo:rerun-if-changed=src/plugins");
}
