use colsav_core::core_api::{Engine, Session};
use colsav_core::routes::Medium;
use colsav_render::{
    MapLayer, render_colonies_text, render_json_colonies, render_json_layout,
    render_json_regions, render_json_routes, render_json_summary, render_json_villages,
    render_layout, render_map, render_region_report, render_routes, render_summary_text,
    render_villages_text,
};
use serde_json::Value;

const WIDTH: usize = 8;
const HEIGHT: usize = 6;

/// 8x6 ocean with a five-tile island, one English colony and one Inca
/// capital.
fn fixture() -> Vec<u8> {
    let size = WIDTH * HEIGHT;
    let mut terrain = vec![25u8; size];
    let mut mask = vec![0u8; size];
    let mut path = vec![1u8; size];
    for row in 0..HEIGHT {
        for col in 0..WIDTH {
            if row == 0 || col == 0 || row + 1 == HEIGHT || col + 1 == WIDTH {
                path[row * WIDTH + col] = 0;
            }
        }
    }
    for (row, col, byte) in [
        (2, 2, 4 | 0x08),
        (2, 3, 4 | 0x20),
        (2, 4, 4 | 0xA0),
        (3, 2, 2),
        (3, 3, 2),
    ] {
        terrain[row * WIDTH + col] = byte;
        path[row * WIDTH + col] = 2;
    }
    mask[WIDTH + 6] = 0x20;

    let mut out = vec![0u8; 0x186];
    out[0x0C..0x0E].copy_from_slice(&(WIDTH as u16).to_le_bytes());
    out[0x0E..0x10].copy_from_slice(&(HEIGHT as u16).to_le_bytes());
    out[0x2A] = 1;
    out[0x2E] = 1;

    let mut colony = vec![0u8; 0xCA];
    colony[0] = 2;
    colony[1] = 3;
    colony[2..11].copy_from_slice(b"Roanoke\0\0");
    colony[0x1F] = 2;
    colony[0x84] = 0x01;
    colony[0x92..0x94].copy_from_slice(&40u16.to_le_bytes());
    colony[0x9A..0x9C].copy_from_slice(&12u16.to_le_bytes());
    out.extend_from_slice(&colony);

    for power in 0..4 {
        let mut rec = vec![0u8; 0x13C];
        if power == 0 {
            rec[7] = 0x01;
        }
        out.extend_from_slice(&rec);
    }

    let mut village = vec![0u8; 0x12];
    village[0] = 3;
    village[1] = 3;
    village[2] = 4;
    village[3] = 0x04;
    village[5] = 0x02;
    out.extend_from_slice(&village);
    out.resize(out.len() + 0x547, 0);

    out.extend_from_slice(&terrain);
    out.extend_from_slice(&mask);
    out.extend_from_slice(&path);
    out.resize(out.len() + size + 0x264, 0);
    out.push(0x00);
    out.extend_from_slice(&[0xAB, 0xCD]);
    out
}

fn session() -> Session {
    Engine::new()
        .open_bytes(fixture())
        .expect("fixture should parse")
}

fn keys(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect()
}

#[test]
fn summary_json_keeps_field_order() {
    let value = render_json_summary(&session());
    assert_eq!(
        keys(&value),
        vec![
            "map_width",
            "map_height",
            "colony_count",
            "unit_count",
            "village_count",
            "prime",
            "lcr",
            "powers",
            "colonies",
        ]
    );
    assert_eq!(value["map_width"], 8);
    assert_eq!(value["powers"][0]["power"], "English");
    assert_eq!(value["powers"][0]["adam_smith"], true);
    assert_eq!(value["powers"][1]["adam_smith"], false);
}

#[test]
fn colony_json_lists_buildings_and_cargo() {
    let value = render_json_colonies(&session());
    let colony = &value[0];
    assert_eq!(colony["name"], "Roanoke");
    assert_eq!(colony["power"], "English");
    assert_eq!(colony["fortification"], "stockade");
    assert_eq!(colony["buildings"], serde_json::json!(["stockade"]));
    assert_eq!(colony["cargo"], serde_json::json!({ "Food": 12 }));
    assert_eq!(colony["hammers"], 40);
}

#[test]
fn village_json_reports_mission() {
    let value = render_json_villages(&session());
    assert_eq!(value[0]["tribe"], "Inca");
    assert_eq!(value[0]["culture"], "civilized");
    assert_eq!(value[0]["capital"], true);
    assert_eq!(value[0]["mission"], "Spanish");
}

#[test]
fn terrain_map_marks_settlements_and_relief() {
    let text = render_map(&session(), MapLayer::Terrain);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "~~~~~~~~",
            "~~~~~~~~",
            "~~Gn^~~~",
            "~~#@~~~~",
            "~~~~~~~~",
            "~~~~~~~~",
        ]
    );
}

#[test]
fn region_map_prints_hex_labels() {
    let text = render_map(&session(), MapLayer::Regions);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "00000000");
    assert_eq!(lines[2], "01222110");
    assert_eq!(lines[3], "01221110");
}

#[test]
fn pacific_and_overlay_layers() {
    let s = session();
    let pacific = render_map(&s, MapLayer::Pacific);
    let lines: Vec<&str> = pacific.lines().collect();
    assert_eq!(lines[1], "~~~~~~P~");
    assert_eq!(lines[2], "~~...~~~");

    let overlays = render_map(&s, MapLayer::Overlays);
    let row: Vec<char> = overlays
        .lines()
        .nth(1)
        .expect("row 1")
        .chars()
        .collect();
    assert_eq!(row.len(), WIDTH);
    assert_eq!(row[4], '*');
}

#[test]
fn summary_text_lists_fathers() {
    let text = render_summary_text(&session());
    assert!(text.starts_with("Map:       8x6\n"), "{text}");
    assert!(text.contains("English    Adam Smith\n"), "{text}");
    assert!(text.contains("Dutch      none\n"), "{text}");
}

#[test]
fn colony_and_village_tables() {
    let s = session();
    let colonies = render_colonies_text(&s);
    let mut lines = colonies.lines();
    assert!(lines.next().expect("header").trim_start().starts_with("#  Name"));
    let row = lines.next().expect("colony row");
    assert!(row.contains("Roanoke"), "{row}");
    assert!(row.contains("3,2"), "{row}");
    assert!(row.trim_end().ends_with("stockade"), "{row}");
    assert_eq!(lines.next().map(str::trim), Some("stockade"));

    let villages = render_villages_text(&s);
    assert!(villages.contains("Inca"), "{villages}");
    assert!(villages.contains("capital"), "{villages}");
    assert!(villages.contains("mission:Spanish"), "{villages}");
}

#[test]
fn route_views_agree() {
    let s = session();
    let sea = s.generated_routes(Medium::Sea);
    let text = render_routes(&sea);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "sea routes (2x2 blocks)");
    assert_eq!(lines[1], "04 40");
    assert_eq!(lines[2], "00 00");
    assert!(lines[3].starts_with("bits: N=01 NE=02 E=04"));

    let json = render_json_routes(&sea);
    assert_eq!(json["medium"], "sea");
    assert_eq!(json["blocks"], serde_json::json!([[4, 64], [0, 0]]));
}

#[test]
fn region_and_layout_reports() {
    let s = session();
    let report = s.check_regions();
    assert_eq!(render_region_report(&report), "regions ok (2 areas)\n");
    let json = render_json_regions(&report);
    assert_eq!(json["ok"], true);
    assert_eq!(json["issue"], Value::Null);

    let layout = s.layout();
    let text = render_layout(&layout);
    assert!(text.starts_with("header"), "{text}");
    assert!(
        text.trim_end()
            .ends_with(&format!("layout ok ({} bytes)", fixture().len())),
        "{text}"
    );
    let json = render_json_layout(&layout);
    assert_eq!(json["valid"], true);
    assert_eq!(json["sections"][0]["id"], "header");
    assert_eq!(json["sections"][0]["end"], 0x186);
}
