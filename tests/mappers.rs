//! Full mapper pipelines over the in-memory source, plus registry dispatch.
use std::fs;
use std::path::Path;

use bandmap::core::geolocate::{GeoReference, WGS84_WKT};
use bandmap::io::source::ProductMetadata;
use bandmap::io::{MemoryDataset, MemorySource, MemorySubDataset};
use bandmap::mappers::{amsr2_l3, globcolour_l3, obpg_l2};
use bandmap::{Error, api};
use chrono::{Datelike, Timelike};
use ndarray::{Array2, array};

fn l2_metadata() -> ProductMetadata {
    let mut metadata = ProductMetadata::new();
    metadata.insert("Title", "HMODISA Level-2 Data");
    metadata.insert("NC_GLOBAL#time_coverage_start", "2012-06-14T12:01:40.000Z");
    metadata
}

fn l2_dataset() -> MemoryDataset {
    MemoryDataset::new(l2_metadata())
        .with_subdataset(
            MemorySubDataset::new("Rrs_412", "Rrs_412", Array2::from_elem((4, 4), 0.01))
                .with_metadata("slope", "2.0E-4")
                .with_metadata("intercept", "0.05"),
        )
        .with_subdataset(MemorySubDataset::new(
            "chlor_a",
            "chlor_a",
            Array2::from_elem((4, 4), 0.8),
        ))
        .with_subdataset(MemorySubDataset::new(
            "longitude",
            "longitude",
            Array2::from_shape_fn((4, 4), |(_, j)| 10.0 + j as f64),
        ))
        .with_subdataset(MemorySubDataset::new(
            "latitude",
            "latitude",
            Array2::from_shape_fn((4, 4), |(i, _)| 70.0 - i as f64),
        ))
}

#[test]
fn obpg_l2_full_pipeline() {
    let source = MemorySource::new();
    source.insert_dataset("/data/A2012166.L2_LAC.hdf", l2_dataset());

    let raster = obpg_l2::mapper()
        .open(&source, Path::new("/data/A2012166.L2_LAC.hdf"))
        .unwrap();

    assert_eq!(raster.mapper, "obpg_l2");
    assert_eq!(raster.size, (4, 4));
    let names: Vec<_> = raster
        .bands
        .iter()
        .filter_map(|b| b.meta.name.as_deref())
        .collect();
    assert_eq!(names, vec!["Rrs_412", "algal_1"]);

    let GeoReference::GroundControlPoints { gcps, projection } = &raster.geo else {
        panic!("expected GCP georeferencing");
    };
    assert_eq!(projection, WGS84_WKT);
    // 4x4 grid with at most 1000 points: every pixel becomes a GCP.
    assert_eq!(gcps.len(), 16);
    assert_eq!(gcps[0].x, 10.0);
    assert_eq!(gcps[0].y, 70.0);

    let time = raster.time.expect("acquisition time");
    assert_eq!((time.year(), time.month(), time.day()), (2012, 6, 14));
    assert_eq!(time.hour(), 12);
}

#[test]
fn obpg_l2_geolocation_array_variant() {
    let source = MemorySource::new();
    source.insert_dataset("/data/A2012166.L2_LAC.hdf", l2_dataset());

    let raster = obpg_l2::mapper_with_geolocation_arrays()
        .open(&source, Path::new("/data/A2012166.L2_LAC.hdf"))
        .unwrap();

    let GeoReference::GeolocationArrays {
        x_locator,
        y_locator,
        pixel_step,
        line_step,
        ..
    } = &raster.geo
    else {
        panic!("expected geolocation arrays");
    };
    assert!(x_locator.contains("longitude"));
    assert!(y_locator.contains("latitude"));
    assert_eq!((*pixel_step, *line_step), (1, 1));

    // The same reference also lands in the VRT's GEOLOCATION domain.
    let xml = raster.to_vrt_xml().unwrap();
    assert!(xml.contains("<Metadata domain=\"GEOLOCATION\">"));
}

#[test]
fn globcolour_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let chl_name = "L3m_20100916-20100916__GLOB_4_AV-MER_CHL1_DAY_00.nc";
    let l412_name = "L3m_20100916-20100916__GLOB_4_AV-MER_L412_DAY_00.nc";
    let chl_path = dir.path().join(chl_name);
    let l412_path = dir.path().join(l412_name);
    fs::write(&chl_path, b"").unwrap();
    fs::write(&l412_path, b"").unwrap();

    let mut metadata = ProductMetadata::new();
    metadata.insert("NC_GLOBAL#title", "GlobColour merged product");
    let transform = [-180.0, 0.25, 0.0, 90.0, 0.0, -0.25];

    let source = MemorySource::new();
    source.insert_dataset(
        chl_path.to_string_lossy(),
        MemoryDataset::new(metadata.clone())
            .with_subdataset(
                MemorySubDataset::new("CHL1_mean", "CHL1_mean", array![[0.4, 0.5], [0.6, 0.7]])
                    .with_geo_transform(transform),
            )
            .with_subdataset(MemorySubDataset::new(
                "CHL1_flags",
                "CHL1_flags",
                array![[1.0, 8.0], [0.0, 9.0]],
            )),
    );
    source.insert_dataset(
        l412_path.to_string_lossy(),
        MemoryDataset::new(metadata).with_subdataset(
            MemorySubDataset::new("L412_mean", "L412_mean", array![[1.0, 2.0], [3.0, 4.0]])
                .with_metadata("solar_irradiance", "172.912"),
        ),
    );

    let raster = globcolour_l3::mapper().open(&source, &chl_path).unwrap();

    let names: Vec<_> = raster
        .bands
        .iter()
        .filter_map(|b| b.meta.name.as_deref())
        .collect();
    assert_eq!(names, vec!["CHL1_mean", "nLw_412", "Rrsw_412", "mask"]);
    assert_eq!(raster.size, (2, 2));
    let GeoReference::Grid {
        transform: got,
        projection,
    } = &raster.geo
    else {
        panic!("expected grid georeferencing");
    };
    assert_eq!(*got, transform);
    assert_eq!(projection, WGS84_WKT);
}

#[test]
fn globcolour_rejects_a_mask_off_the_geolocation_grid() {
    let dir = tempfile::tempdir().unwrap();
    let chl_name = "L3m_20100916-20100916__GLOB_4_AV-MER_CHL1_DAY_00.nc";
    let chl_path = dir.path().join(chl_name);
    fs::write(&chl_path, b"").unwrap();

    let mut metadata = ProductMetadata::new();
    metadata.insert("NC_GLOBAL#title", "GlobColour merged product");
    let source = MemorySource::new();
    source.insert_dataset(
        chl_path.to_string_lossy(),
        MemoryDataset::new(metadata)
            .with_subdataset(
                MemorySubDataset::new("CHL1_mean", "CHL1_mean", array![[0.4, 0.5], [0.6, 0.7]])
                    .with_geo_transform([-180.0, 0.25, 0.0, 90.0, 0.0, -0.25]),
            )
            // Flag array larger than the data grid.
            .with_subdataset(MemorySubDataset::new(
                "CHL1_flags",
                "CHL1_flags",
                array![[1.0, 8.0, 0.0], [0.0, 9.0, 4.0], [0.0, 0.0, 0.0]],
            )),
    );

    let result = globcolour_l3::mapper().open(&source, &chl_path);
    assert!(matches!(
        result,
        Err(Error::MaskDimensionMismatch {
            mask: (3, 3),
            grid: (2, 2),
        })
    ));
}

#[test]
fn obpg_l2_rejects_mismatched_coordinate_shapes() {
    let source = MemorySource::new();
    source.insert_dataset(
        "/data/A2012166.L2_LAC.hdf",
        MemoryDataset::new(l2_metadata())
            .with_subdataset(MemorySubDataset::new(
                "chlor_a",
                "chlor_a",
                Array2::from_elem((4, 4), 0.8),
            ))
            .with_subdataset(MemorySubDataset::new(
                "longitude",
                "longitude",
                Array2::from_elem((4, 4), 10.0),
            ))
            .with_subdataset(MemorySubDataset::new(
                "latitude",
                "latitude",
                Array2::from_elem((3, 3), 70.0),
            )),
    );

    let result = obpg_l2::mapper().open(&source, Path::new("/data/A2012166.L2_LAC.hdf"));
    assert!(matches!(
        result,
        Err(Error::CoordinateShapeMismatch {
            lon: (4, 4),
            lat: (3, 3),
        })
    ));
}

fn amsr2_metadata() -> ProductMetadata {
    let mut metadata = ProductMetadata::new();
    metadata.insert("PlatformShortName", "GCOM-W1");
    metadata.insert("SensorShortName", "AMSR2");
    metadata.insert("ProductName", "AMSR2-L3");
    metadata.insert("ObservationStartDateTime", "2012-07-02T01:00:00.000Z");
    metadata
}

#[test]
fn amsr2_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let names = [
        "GW1AM2_20120702_01D_EQMA_L3SGT06HA2220220.h5",
        "GW1AM2_20120702_01D_EQMA_L3SGT36HA2220220.h5",
    ];
    let source = MemorySource::new();
    for name in names {
        let path = dir.path().join(name);
        fs::write(&path, b"").unwrap();
        source.insert_dataset(
            path.to_string_lossy(),
            MemoryDataset::new(amsr2_metadata())
                .with_subdataset(MemorySubDataset::new(
                    "Brightness_Temperature_(H)",
                    "Brightness Temperature (H)",
                    array![[24000.0]],
                ))
                .with_subdataset(MemorySubDataset::new(
                    "Brightness_Temperature_(V)",
                    "Brightness Temperature (V)",
                    array![[25000.0]],
                )),
        );
    }

    let raster = amsr2_l3::mapper()
        .open(&source, &dir.path().join(names[0]))
        .unwrap();

    let names: Vec<_> = raster
        .bands
        .iter()
        .filter_map(|b| b.meta.name.as_deref())
        .collect();
    assert_eq!(names, vec!["tb06H", "tb06V", "tb36H", "tb36V"]);
    // The NSIDC 10 km grid is a constant, independent of the inputs.
    assert_eq!(raster.size, (760, 1120));
    let GeoReference::Grid {
        transform,
        projection,
    } = &raster.geo
    else {
        panic!("expected grid georeferencing");
    };
    assert_eq!(
        *transform,
        [-3_850_000.0, 10_000.0, 0.0, 5_850_000.0, 0.0, -10_000.0]
    );
    assert_eq!(projection, "EPSG:3411");
    assert!(raster.time.is_some());
}

#[test]
fn registry_dispatch_falls_through_on_mismatch() {
    let source = MemorySource::new();
    source.insert_dataset("/data/A2012166.L2_LAC.hdf", l2_dataset());

    // AMSR2 and GlobColour reject on fingerprints, the OBPG mapper accepts.
    let registry = vec![
        amsr2_l3::mapper(),
        globcolour_l3::mapper(),
        obpg_l2::mapper(),
    ];
    let raster = api::open_product(
        &source,
        Path::new("/data/A2012166.L2_LAC.hdf"),
        &registry,
    )
    .unwrap();
    assert_eq!(raster.mapper, "obpg_l2");
}

#[test]
fn unrecognized_file_reports_no_mapper() {
    let source = MemorySource::new();
    let mut metadata = ProductMetadata::new();
    metadata.insert("Title", "Some other product");
    source.insert_dataset(
        "/data/unknown.nc",
        MemoryDataset::new(metadata).with_subdataset(MemorySubDataset::new(
            "layer",
            "layer",
            array![[0.0]],
        )),
    );

    let registry = vec![obpg_l2::mapper(), globcolour_l3::mapper()];
    let result = api::open_product(&source, Path::new("/data/unknown.nc"), &registry);
    assert!(matches!(result, Err(Error::NoMapperMatched { .. })));
}

#[test]
fn json_summary_lists_bands() {
    let source = MemorySource::new();
    source.insert_dataset("/data/A2012166.L2_LAC.hdf", l2_dataset());
    let raster = obpg_l2::mapper()
        .open(&source, Path::new("/data/A2012166.L2_LAC.hdf"))
        .unwrap();
    let json = raster.to_json().unwrap();
    assert!(json.contains("\"mapper\": \"obpg_l2\""));
    assert!(json.contains("algal_1"));
    assert!(json.contains("ReflectanceRatioAir"));
}
