#[cfg(feature = "gui")]
fn main() -> bandmap::error::Result<()> {
    use bandmap::io::source::RasterSource;
    use bandmap::picker::app::{init_picker_logging, pick_points};

    init_picker_logging();

    let path = std::env::args().nth(1).ok_or(bandmap::error::Error::InvalidArgument {
        arg: "path",
        value: "usage: bandmap-picker <product-file>".to_string(),
    })?;

    let opened = bandmap::api::open(&path)?;
    let band = &opened.raster.bands[0];
    tracing::info!(
        "picking over band {} of {}",
        band.meta.name.as_deref().unwrap_or("?"),
        path
    );
    let data = opened.source.read_array(&band.source.locator)?;

    let polylines = pick_points(&data)?;
    println!("{}", serde_json::to_string_pretty(&polylines)?);
    Ok(())
}

#[cfg(not(feature = "gui"))]
fn main() {
    eprintln!("GUI feature is not enabled. Please build with --features gui");
    std::process::exit(1);
}
