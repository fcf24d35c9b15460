use std::borrow::Cow;

use anyhow::{Result, anyhow};
use parkcast_app_lib::mk_specta;
use specta_typescript::Typescript;

const DEFAULT_BINDINGS_PATH: &str = "../frontend/src/bindings.ts";

pub fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_BINDINGS_PATH.to_string());
    let mut lang = Typescript::new();
    lang.header = Cow::Borrowed("/* eslint @typescript-eslint/no-unused-vars: 0 */");
    mk_specta()
        .export(lang, &path)
        .map_err(|err| anyhow!("Failed to export types to {path}: {err:?}"))?;
    println!("Exported commands, events, and types to {path}");
    Ok(())
}
