// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Build a small building, write it to disk and read the file back

use approx::assert_relative_eq;
use ifc_writer::{
    BuildingRequest, IfcWriter, LayerSetSpec, MaterialLayerSpec, StoreySpec, SurfaceColour, WriterConfig,
};
use ifc_writer_core::{parse_entity, read_schema, EntityScanner, GlobalId, IfcType, Token};

const REQUEST: &str = r#"{
    "project": {"projectName": "Riverside Block", "author": "Kim"},
    "materialLayerSets": [
        {"name": "EXT-250", "layers": [
            {"name": "Concrete", "thickness": 0.2, "rgba": {"r": 160, "g": 160, "b": 160, "a": 0}},
            {"name": "Insulation", "thickness": 0.05, "rgba": {"r": 250, "g": 230, "b": 80, "a": 0}}
        ]}
    ],
    "items": [
        {"ifcClass": "IfcBuildingStorey", "name": "1F", "height": 0.0},
        {"ifcClass": "IfcBuildingStorey", "name": "2F", "height": 3.5},
        {"ifcClass": "IfcColumn", "coordinate": [0, 0], "height": 3.5, "rotation": 0, "targetStorey": "1F"},
        {"ifcClass": "IfcColumn", "coordinate": [6, 0], "height": 3.5, "rotation": 90, "targetStorey": "1F"},
        {"ifcClass": "IfcColumn", "coordinate": [0, 8], "height": 3.5, "rotation": 0, "targetStorey": "2F",
         "typeName": "RC-D500", "profileName": "D500", "profile": {"radius": 0.25}},
        {"ifcClass": "IfcBeam", "startPt": [0, 0], "endPt": [6, 0], "height": 3.5, "targetStorey": "1F", "rotation": 0},
        {"ifcClass": "IfcWallStandardCase", "startPt": [0, 0], "endPt": [0, 8], "height": 3.5,
         "zOffset": 0, "thickness": 0.25, "targetStorey": "1F", "materialLayerSet": "EXT-250"},
        {"ifcClass": "IfcWallStandardCase", "startPt": [6, 0], "endPt": [6, 8], "height": 3.5,
         "zOffset": 0, "thickness": 0.2, "targetStorey": "2F"},
        {"ifcClass": "IfcBuildingElementProxy", "coordinate": [3, 0], "zOffset": -0.5, "rotation": 270,
         "dipping": 30, "freeLength": 6, "fixedLength": 5, "waleWidth": 0.3, "waleDepth": 0.3, "targetStorey": "1F"}
    ]
}"#;

fn build(request: &BuildingRequest) -> IfcWriter {
    let mut writer = IfcWriter::new(request.project.clone().unwrap_or_default());
    for set in &request.material_layer_sets {
        writer.create_material_layer_set(&set.name, &set.layers).unwrap();
    }
    for item in &request.items {
        writer.apply(item).unwrap();
    }
    writer
}

#[test]
fn test_written_file_reads_back() {
    let request: BuildingRequest = serde_json::from_str(REQUEST).unwrap();
    let writer = build(&request);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("riverside.ifc");
    writer.save(&path).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();

    assert_eq!(read_schema(&content), Some("IFC4"));
    assert!(content.contains("FILE_NAME('riverside.ifc',"));
    assert!(content.trim_end().ends_with("END-ISO-10303-21;"));

    let mut scanner = EntityScanner::new(&content);
    let counts = scanner.count_by_type();
    let count = |name: &str| counts.get(name).copied().unwrap_or(0);
    assert_eq!(count("IFCPROJECT"), 1);
    assert_eq!(count("IFCBUILDINGSTOREY"), 2);
    assert_eq!(count("IFCCOLUMN"), 3);
    assert_eq!(count("IFCCOLUMNTYPE"), 2);
    assert_eq!(count("IFCBEAM"), 1);
    assert_eq!(count("IFCWALLSTANDARDCASE"), 2);
    assert_eq!(count("IFCWALLTYPE"), 1);
    assert_eq!(count("IFCBUILDINGELEMENTPROXY"), 1);
    assert_eq!(count("IFCBUILDINGELEMENTPROXYTYPE"), 1);
    // one containment relation per storey
    assert_eq!(count("IFCRELCONTAINEDINSPATIALSTRUCTURE"), 2);
    assert_eq!(count("IFCMATERIALLAYERSETUSAGE"), 1);
    assert_eq!(count("IFCMATERIAL"), 3);
    assert_eq!(
        counts.values().sum::<usize>(),
        writer.model().len(),
        "every entity line is found by the scanner"
    );
}

#[test]
fn test_every_line_parses() {
    let request: BuildingRequest = serde_json::from_str(REQUEST).unwrap();
    let text = build(&request).to_step_string().unwrap();

    let mut scanner = EntityScanner::new(&text);
    let mut seen = 0;
    while let Some((id, _, start, end)) = scanner.next_entity() {
        let entity = parse_entity(scanner.line(start, end)).unwrap();
        assert_eq!(entity.id, id);
        if entity.ifc_type.is_rooted() {
            let gid = entity.args[0].as_string().unwrap();
            assert!(GlobalId::parse(&gid).is_ok(), "bad GlobalId {}", gid);
        }
        seen += 1;
    }
    assert!(seen > 100);
}

#[test]
fn test_project_name_and_storey_elevation() {
    let request: BuildingRequest = serde_json::from_str(REQUEST).unwrap();
    let text = build(&request).to_step_string().unwrap();
    let mut scanner = EntityScanner::new(&text);

    let (_, start, end) = scanner.find_by_type("IFCPROJECT")[0];
    let project = parse_entity(scanner.line(start, end)).unwrap();
    assert_eq!(project.args[2].as_string().as_deref(), Some("Riverside Block"));

    scanner.reset();
    let storeys = scanner.find_by_type("IFCBUILDINGSTOREY");
    let (_, start, end) = storeys[1];
    let storey = parse_entity(scanner.line(start, end)).unwrap();
    assert_eq!(storey.ifc_type, IfcType::IfcBuildingStorey);
    assert_eq!(storey.args[2].as_string().as_deref(), Some("2F"));
    assert_relative_eq!(storey.args[9].as_float().unwrap(), 3.5);
}

#[test]
fn test_beam_trim_parameters_in_radians() {
    let request: BuildingRequest = serde_json::from_str(REQUEST).unwrap();
    let text = build(&request).to_step_string().unwrap();
    let mut scanner = EntityScanner::new(&text);

    let trims = scanner.find_by_type("IFCTRIMMEDCURVE");
    assert_eq!(trims.len(), 4);
    for (_, start, end) in trims {
        let curve = parse_entity(scanner.line(start, end)).unwrap();
        let trim2 = &curve.args[2].as_list().unwrap()[0];
        match trim2 {
            Token::TypedValue(name, values) => {
                assert_eq!(*name, "IFCPARAMETERVALUE");
                assert_relative_eq!(values[0].as_float().unwrap(), std::f64::consts::FRAC_PI_2);
            }
            other => panic!("unexpected trim {:?}", other),
        }
    }
}

#[test]
fn test_failed_items_leave_model_usable() {
    let mut writer = IfcWriter::new(WriterConfig::default());
    writer.create_storey(&StoreySpec::new("1F", 0.0)).unwrap();
    writer
        .create_material_layer_set(
            "INT",
            &[MaterialLayerSpec::new("Gypsum", 0.1, SurfaceColour::GREY)],
        )
        .unwrap();
    let sets = [LayerSetSpec {
        name: "INT".to_string(),
        layers: vec![],
    }];
    assert!(writer.create_material_layer_set(&sets[0].name, &sets[0].layers).is_err());

    let bad: ifc_writer::ElementRequest = serde_json::from_str(
        r#"{"ifcClass": "IfcWallStandardCase", "startPt": [1, 1], "endPt": [1, 1], "height": 3,
            "thickness": 0.1, "targetStorey": "1F"}"#,
    )
    .unwrap();
    let before = writer.model().len();
    assert!(writer.apply(&bad).is_err());
    assert_eq!(writer.model().len(), before);

    let text = writer.to_step_string().unwrap();
    assert_eq!(
        EntityScanner::new(&text).count_by_type().values().sum::<usize>(),
        writer.model().len()
    );
    assert_eq!(writer.model().count(IfcType::IfcWallStandardCase), 0);
}
