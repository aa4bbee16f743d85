use std::collections::HashMap;
use std::env;
use std::fmt::Write;
use std::path::PathBuf;

fn main() {
    // (Variable, Type, Default value)
    let mut configs: HashMap<&str, (&str, &str)> = HashMap::from([
        ("MAC_MIN_BE", ("u8", "0")),
        ("MAC_MAX_BE", ("u8", "8")),
        ("MAC_MAX_CSMA_BACKOFFS", ("u8", "16")),
        ("UNIT_BACKOFF_US", ("u32", "320")),
        ("MAC_MAX_FRAME_RETRIES", ("u8", "3")),
        ("WFA_MS", ("u32", "5")),
        ("PACKETBUF_SIZE", ("usize", "127")),
        ("MAC_PAN_ID", ("u16", "0xffff")),
    ]);

    println!("cargo:rerun-if-changed=build.rs");
    for name in configs.keys() {
        println!("cargo:rerun-if-env-changed=DOT15D4_MAC_{name}");
    }

    let mut data = String::new();

    for (var, value) in std::env::vars() {
        if let Some(name) = var.strip_prefix("DOT15D4_MAC_") {
            let Some((_, (ty, _))) = configs.remove_entry(name) else {
                panic!("unknown configuration variable {name}");
            };
            writeln!(data, "pub const {name}: {ty} = {value};").unwrap();
        }
    }

    for (name, (ty, value)) in configs.iter() {
        writeln!(data, "pub const {name}: {ty} = {value};").unwrap();
    }

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    let out_file = out_dir.join("config.rs");
    std::fs::write(out_file, data).unwrap();
}
