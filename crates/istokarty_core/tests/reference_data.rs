use istokarty_core::{Catalog, CatalogError, GRADE_RANGE};
use std::collections::HashSet;
use std::error::Error;

#[test]
fn builtin_catalog_has_four_periods_in_chronological_order() {
    let catalog = Catalog::builtin().unwrap();
    let ids = catalog
        .periods()
        .iter()
        .map(|period| period.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["ancient", "medieval", "modern", "contemporary"]);
    assert!(catalog.periods().iter().all(|period| period.map_image.is_none()));
}

#[test]
fn builtin_catalog_covers_every_grade_from_five_to_eleven() {
    let catalog = Catalog::builtin().unwrap();
    let grades = catalog
        .grades()
        .iter()
        .map(|grade| grade.grade)
        .collect::<Vec<_>>();
    assert_eq!(grades, GRADE_RANGE.collect::<Vec<_>>());
    assert_eq!(catalog.grades().get(6).unwrap().title, "6 класс");
}

#[test]
fn builtin_events_are_unique_and_reference_known_periods() {
    let catalog = Catalog::builtin().unwrap();
    let mut seen = HashSet::new();
    for event in catalog.events().iter() {
        assert!(seen.insert(event.id.clone()), "duplicate id {}", event.id);
        assert!(catalog.periods().contains(&event.period));
        assert!((0.0..=100.0).contains(&event.coordinates.x));
        assert!((0.0..=100.0).contains(&event.coordinates.y));
        assert!(event.map_image.is_none());
    }
    assert_eq!(catalog.events().records()[0].id, "1");
    assert_eq!(catalog.events().records()[43].id, "44");
}

#[test]
fn builtin_returns_independent_copies() {
    let first = Catalog::builtin().unwrap();
    let second = Catalog::builtin().unwrap();
    assert_eq!(first, second);
}

#[test]
fn from_json_rejects_grade_with_unknown_period() {
    let json = r#"{
        "periods": [
            {"id": "ancient", "name": "A", "years": "y", "color": "c", "description": "d"}
        ],
        "grades": [
            {"grade": 6, "title": "6", "periods": ["ancient", "medieval"], "icon": "Castle"}
        ],
        "events": []
    }"#;
    let err = Catalog::from_json(json).unwrap_err();
    assert_eq!(
        err,
        CatalogError::UnknownPeriodReference {
            owner: "grade 6".to_string(),
            period: "medieval".to_string(),
        }
    );
}

#[test]
fn from_json_rejects_duplicate_event_ids() {
    let json = r#"{
        "periods": [
            {"id": "ancient", "name": "A", "years": "y", "color": "c", "description": "d"}
        ],
        "grades": [],
        "events": [
            {"id": "1", "year": -1, "title": "a", "description": "d",
             "coordinates": {"x": 1, "y": 1}, "period": "ancient"},
            {"id": "1", "year": -2, "title": "b", "description": "d",
             "coordinates": {"x": 2, "y": 2}, "period": "ancient"}
        ]
    }"#;
    let err = Catalog::from_json(json).unwrap_err();
    assert_eq!(err, CatalogError::DuplicateEventId("1".to_string()));
}

#[test]
fn from_json_reports_malformed_json_as_parse_error() {
    let err = Catalog::from_json("{ not json").unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)));
    assert!(err.to_string().starts_with("invalid reference data"));
    assert!(err.source().is_some());
}

#[test]
fn from_json_rejects_period_id_reserved_for_all_filter() {
    let json = r#"{
        "periods": [
            {"id": "all", "name": "All", "years": "y", "color": "c", "description": "d"},
            {"id": "modern", "name": "M", "years": "y", "color": "c", "description": "d"}
        ],
        "grades": [],
        "events": [{"id": "1", "year": 1500, "title": "a", "description": "d",
                    "coordinates": {"x": 1, "y": 1}, "period": "all"}]
    }"#;
    let err = Catalog::from_json(json).unwrap_err();
    assert_eq!(
        err,
        CatalogError::ReservedId {
            table: "periods",
            id: "all".to_string(),
        }
    );
}

#[test]
fn optional_map_image_is_read_and_omitted_when_absent() {
    let json = r#"{
        "periods": [{"id": "ancient", "name": "A", "years": "y", "color": "c", "description": "d",
                     "map_image": "maps/ancient.png"}],
        "grades": [],
        "events": [{"id": "1", "year": -1, "title": "a", "description": "d",
                    "coordinates": {"x": 1, "y": 1}, "period": "ancient"}]
    }"#;
    let catalog = Catalog::from_json(json).unwrap();
    assert_eq!(
        catalog.periods().get("ancient").unwrap().map_image.as_deref(),
        Some("maps/ancient.png")
    );

    let event_json = serde_json::to_value(catalog.events().get("1").unwrap()).unwrap();
    assert!(event_json.get("map_image").is_none());
    assert_eq!(event_json["coordinates"]["x"], 1.0);
}
