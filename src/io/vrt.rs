//! Render an assembled [`VirtualRaster`] as a GDAL VRT document. Bands become
//! `ComplexSource` entries (scale/offset folded into the source), destination
//! metadata becomes per-band `MDI` entries, and the spatial reference becomes
//! `SRS`+`GeoTransform`, a `GCPList`, or a `GEOLOCATION` metadata domain.
use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::BytesText;

use crate::core::descriptor::BandDescriptor;
use crate::core::geolocate::GeoReference;
use crate::error::{Error, Result};
use crate::mappers::VirtualRaster;

type XmlResult<T> = std::result::Result<T, quick_xml::Error>;

pub fn write_vrt(raster: &VirtualRaster) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    let (cols, rows) = raster.size;
    let x_size = cols.to_string();
    let y_size = rows.to_string();
    writer
        .create_element("VRTDataset")
        .with_attributes([("rasterXSize", x_size.as_str()), ("rasterYSize", y_size.as_str())])
        .write_inner_content(|w| {
            write_geo(w, &raster.geo)?;
            if let Some(time) = raster.time {
                w.create_element("Metadata").write_inner_content(|w| {
                    write_mdi(w, "start_time", &time.to_rfc3339())
                })?;
            }
            for (index, band) in raster.bands.iter().enumerate() {
                write_band(w, index + 1, band)?;
            }
            Ok(())
        })?;
    String::from_utf8(writer.into_inner().into_inner()).map_err(Error::external)
}

fn write_geo(w: &mut Writer<Cursor<Vec<u8>>>, geo: &GeoReference) -> XmlResult<()> {
    match geo {
        GeoReference::Grid {
            transform,
            projection,
        } => {
            w.create_element("SRS")
                .write_text_content(BytesText::new(projection))?;
            let coefficients = transform
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            w.create_element("GeoTransform")
                .write_text_content(BytesText::new(&coefficients))?;
        }
        GeoReference::GroundControlPoints { gcps, projection } => {
            w.create_element("GCPList")
                .with_attribute(("Projection", projection.as_str()))
                .write_inner_content(|w| {
                    for (id, gcp) in gcps.iter().enumerate() {
                        let id = id.to_string();
                        let pixel = gcp.pixel.to_string();
                        let line = gcp.line.to_string();
                        let x = gcp.x.to_string();
                        let y = gcp.y.to_string();
                        w.create_element("GCP")
                            .with_attributes([
                                ("Id", id.as_str()),
                                ("Pixel", pixel.as_str()),
                                ("Line", line.as_str()),
                                ("X", x.as_str()),
                                ("Y", y.as_str()),
                            ])
                            .write_empty()?;
                    }
                    Ok(())
                })?;
        }
        GeoReference::GeolocationArrays {
            x_locator,
            y_locator,
            x_band,
            y_band,
            pixel_offset,
            pixel_step,
            line_offset,
            line_step,
            projection,
        } => {
            w.create_element("Metadata")
                .with_attribute(("domain", "GEOLOCATION"))
                .write_inner_content(|w| {
                    write_mdi(w, "SRS", projection)?;
                    write_mdi(w, "X_DATASET", x_locator)?;
                    write_mdi(w, "X_BAND", &x_band.to_string())?;
                    write_mdi(w, "PIXEL_OFFSET", &pixel_offset.to_string())?;
                    write_mdi(w, "PIXEL_STEP", &pixel_step.to_string())?;
                    write_mdi(w, "Y_DATASET", y_locator)?;
                    write_mdi(w, "Y_BAND", &y_band.to_string())?;
                    write_mdi(w, "LINE_OFFSET", &line_offset.to_string())?;
                    write_mdi(w, "LINE_STEP", &line_step.to_string())?;
                    Ok(())
                })?;
        }
    }
    Ok(())
}

fn write_band(
    w: &mut Writer<Cursor<Vec<u8>>>,
    index: usize,
    band: &BandDescriptor,
) -> XmlResult<()> {
    let band_index = index.to_string();
    w.create_element("VRTRasterBand")
        .with_attributes([
            ("dataType", gdal_type_name(band.meta.data_type)),
            ("band", band_index.as_str()),
        ])
        .write_inner_content(|w| {
            w.create_element("Metadata").write_inner_content(|w| {
                if let Some(wkv) = band.meta.wkv {
                    write_mdi(w, "wkv", wkv.as_str())?;
                }
                if let Some(name) = &band.meta.name {
                    write_mdi(w, "name", name)?;
                }
                if let Some(suffix) = &band.meta.suffix {
                    write_mdi(w, "suffix", suffix)?;
                }
                if let Some(wavelength) = &band.meta.wavelength {
                    write_mdi(w, "wavelength", wavelength)?;
                }
                if let Some(frequency) = &band.meta.frequency {
                    write_mdi(w, "frequency", frequency)?;
                }
                if let Some(polarisation) = band.meta.polarisation {
                    write_mdi(w, "polarisation", polarisation.as_str())?;
                }
                if let Some(case) = band.meta.case {
                    write_mdi(w, "case", &case.to_string())?;
                }
                if let Some(expression) = &band.meta.expression {
                    write_mdi(w, "expression", expression)?;
                }
                Ok(())
            })?;
            w.create_element("ComplexSource").write_inner_content(|w| {
                w.create_element("SourceFilename")
                    .with_attribute(("relativeToVRT", "0"))
                    .write_text_content(BytesText::new(&band.source.locator))?;
                w.create_element("SourceBand")
                    .write_text_content(BytesText::new(&band.source.band.to_string()))?;
                if let Some(scale) = band.scale {
                    w.create_element("ScaleRatio")
                        .write_text_content(BytesText::new(&scale.to_string()))?;
                }
                if let Some(offset) = band.offset {
                    w.create_element("ScaleOffset")
                        .write_text_content(BytesText::new(&offset.to_string()))?;
                }
                Ok(())
            })?;
            Ok(())
        })?;
    Ok(())
}

fn write_mdi(w: &mut Writer<Cursor<Vec<u8>>>, key: &str, value: &str) -> XmlResult<()> {
    // Quotes are legal in XML text content; escape only what the spec requires
    // so locators like NETCDF:"a.nc":longitude round-trip verbatim.
    w.create_element("MDI")
        .with_attribute(("key", key))
        .write_text_content(BytesText::from_escaped(quick_xml::escape::partial_escape(
            value,
        )))?;
    Ok(())
}

fn gdal_type_name(code: Option<u32>) -> &'static str {
    match code {
        Some(1) => "Byte",
        Some(2) => "UInt16",
        Some(3) => "Int16",
        Some(4) => "UInt32",
        Some(5) => "Int32",
        Some(7) => "Float64",
        _ => "Float32",
    }
}
