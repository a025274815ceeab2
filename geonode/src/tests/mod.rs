use geonode_types::Geom;

/// Routes `log` output of the code under test to the test harness.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn geom(wkt: &str) -> Geom {
    geonode_types::wkt::read(wkt).expect("valid test WKT")
}

/// One geometry of every kind, arranged so that most pairs interact.
pub fn fixtures() -> Vec<Geom> {
    [
        "POINT (1 1)",
        "POINT (0 2)",
        "POINT EMPTY",
        "LINESTRING (0 0, 4 4)",
        "LINESTRING (-1 2, 5 2)",
        "LINESTRING (1 1, 3 1, 3 3, 1 3, 1 1)",
        "POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0))",
        "POLYGON ((2 2, 6 2, 6 6, 2 6, 2 2))",
        "POLYGON ((-2 -2, 10 -2, 10 10, -2 10, -2 -2), (0 0, 0 4, 4 4, 4 0, 0 0))",
        "MULTIPOINT ((1 1), (5 5), (9 9))",
        "MULTILINESTRING ((0 4, 4 0), (6 6, 8 8))",
        "MULTIPOLYGON (((0 0, 1 0, 1 1, 0 1, 0 0)), ((7 7, 8 7, 8 8, 7 8, 7 7)))",
        "GEOMETRYCOLLECTION (POINT (9 0), LINESTRING (6 0, 8 0), POLYGON ((1 1, 3 1, 3 3, 1 3, 1 1)))",
        "GEOMETRYCOLLECTION (POLYGON ((0 0, 0 2, 2 2, 2 0, 0 0)), POLYGON ((1 1, 1 3, 3 3, 3 1, 1 1)))",
    ]
    .into_iter()
    .map(geom)
    .collect()
}
