use std::collections::HashSet;
use std::io::Write;

use rstest::rstest;

use seoul_explorer::{Coordinates, LandmarkCatalog, SEOUL_CENTER, rank};

#[rstest]
#[case(SEOUL_CENTER)]
#[case(Coordinates::new(37.512, 127.102))]
#[case(Coordinates::new(35.1796, 129.0756))]
#[case(Coordinates::new(-37.5665, -53.022))]
#[case(Coordinates::new(90.0, 0.0))]
fn test_ranking_covers_catalog_nearest_first(#[case] reference: Coordinates) {
    let catalog = LandmarkCatalog::seoul().unwrap();
    let ranked = rank(&reference, &catalog);

    assert_eq!(ranked.len(), catalog.len());
    let ids: HashSet<&str> = ranked.iter().map(|r| r.landmark.id.as_str()).collect();
    assert_eq!(ids.len(), catalog.len());
    assert!(ranked.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    assert!(ranked.iter().all(|r| r.distance_km.is_finite()));
}

#[test]
fn test_catalog_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{
                "id": "gyeongbokgung",
                "name": "Gyeongbokgung Palace",
                "localizedName": "경복궁",
                "category": "historical",
                "description": "Main royal palace of the Joseon dynasty",
                "coordinates": {{"lat": 37.5796, "lng": 126.9770}}
            }}
        ]"#
    )
    .unwrap();

    let catalog = LandmarkCatalog::from_path(file.path()).unwrap();
    assert_eq!(catalog.len(), 1);

    let ranked = rank(&SEOUL_CENTER, &catalog);
    assert_eq!(ranked[0].landmark.name, "Gyeongbokgung Palace");
    assert_eq!(ranked[0].display_distance(), "1.5 km");
}

#[test]
fn test_catalog_from_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(LandmarkCatalog::from_path(dir.path().join("landmarks.json")).is_err());
}
