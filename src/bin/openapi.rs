use anyhow::Result;

// Print the OpenAPI document as JSON
fn main() -> Result<()> {
    let spec = unisignup::api::openapi().to_pretty_json()?;
    println!("{spec}");
    Ok(())
}
