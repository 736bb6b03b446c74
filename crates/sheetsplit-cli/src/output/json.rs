use serde::Serialize;
use sheetsplit_core::error::SheetError;

pub fn print<T: Serialize>(value: &T) -> Result<(), SheetError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
