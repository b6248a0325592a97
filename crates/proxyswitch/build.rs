use std::fs;
use std::path::{Path, PathBuf};

use clap::CommandFactory;

// cli.rs only depends on clap + clap_complete, both build-dependencies.
#[path = "src/cli.rs"]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir: PathBuf = std::env::var_os("OUT_DIR")
        .expect("OUT_DIR not set by Cargo")
        .into();
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("failed to create man output directory");

    let mut pages = Vec::new();
    write_manpages(&cli::Cli::command(), &man_dir, &mut pages);
    write_page_index(&out_dir.join("man_pages.rs"), &pages);
}

/// One page per command, named `proxyswitch-<sub>.1` for subcommands.
/// Every page name is pushed to `pages`.
fn write_manpages(cmd: &clap::Command, dir: &Path, pages: &mut Vec<String>) {
    let name = cmd.get_name().to_owned();
    let path = dir.join(format!("{name}.1"));

    let mut page = Vec::new();
    clap_mangen::Man::new(cmd.clone())
        .render(&mut page)
        .unwrap_or_else(|e| panic!("failed to render man page for `{name}`: {e}"));
    fs::write(&path, page).unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
    pages.push(name.clone());

    for sub in cmd.get_subcommands().filter(|sub| !sub.is_hide_set()) {
        let sub = sub.clone().name(format!("{name}-{}", sub.get_name()));
        write_manpages(&sub, dir, pages);
    }
}

/// `MAN_PAGES`: page name to roff source, embedded by `proxyswitch man`.
fn write_page_index(path: &Path, pages: &[String]) {
    let mut index = String::from("pub const MAN_PAGES: &[(&str, &str)] = &[\n");
    for name in pages {
        index.push_str(&format!(
            "    (\"{name}\", include_str!(concat!(env!(\"OUT_DIR\"), \"/man/{name}.1\"))),\n"
        ));
    }
    index.push_str("];\n");
    fs::write(path, index).unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
}
