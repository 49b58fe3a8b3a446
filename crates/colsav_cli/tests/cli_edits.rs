mod common;

use std::fs;

use common::{
    HEIGHT, WIDTH, fixture, fixture_path, map_size, prime_lcr_offset, run_cli,
    sea_route_start, temp_path, terrain_start,
};
use serde_json::Value;

#[test]
fn edits_require_output() {
    let path = fixture_path("colsav_no_output");
    let output = run_cli(&["--set-prime", "3", path.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("require --output"), "{stderr}");
    let _ = fs::remove_file(path);
}

#[test]
fn output_requires_an_edit() {
    let path = fixture_path("colsav_no_edit");
    let out = temp_path("colsav_no_edit_out", "SAV");
    let output = run_cli(&[
        "--output",
        out.to_str().expect("utf-8 path"),
        path.to_str().expect("utf-8 path"),
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(!out.exists());
    let _ = fs::remove_file(path);
}

#[test]
fn prime_above_fifteen_is_rejected() {
    let path = fixture_path("colsav_prime_range");
    let out = temp_path("colsav_prime_range_out", "SAV");
    let output = run_cli(&[
        "--set-prime",
        "16",
        "--output",
        out.to_str().expect("utf-8 path"),
        path.to_str().expect("utf-8 path"),
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(!out.exists());
    let _ = fs::remove_file(path);
}

#[test]
fn set_lcr_only_touches_the_packed_byte() {
    let path = fixture_path("colsav_lcr");
    let out = temp_path("colsav_lcr_out", "SAV");
    let output = run_cli(&[
        "--set-lcr",
        "5",
        "--output",
        out.to_str().expect("utf-8 path"),
        path.to_str().expect("utf-8 path"),
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Wrote edited save to"), "{stdout}");

    let original = fixture();
    let edited = fs::read(&out).expect("edited save should exist");
    assert_eq!(edited.len(), original.len());
    let differing: Vec<usize> = (0..edited.len())
        .filter(|&i| edited[i] != original[i])
        .collect();
    assert_eq!(differing, vec![prime_lcr_offset()]);
    assert_eq!(edited[prime_lcr_offset()], 0x50);

    let _ = fs::remove_file(path);
    let _ = fs::remove_file(out);
}

#[test]
fn reset_depleted_clears_land_and_rebuilds_routes() {
    let path = fixture_path("colsav_depleted");
    let out = temp_path("colsav_depleted_out", "SAV");
    let output = run_cli(&[
        "--reset-depleted",
        "--output",
        out.to_str().expect("utf-8 path"),
        path.to_str().expect("utf-8 path"),
    ]);
    assert!(output.status.success());

    let edited = fs::read(&out).expect("edited save should exist");
    let mask_idx = terrain_start() + map_size() + 2 * WIDTH + 4;
    assert_eq!(fixture()[mask_idx], 0x04);
    assert_eq!(edited[mask_idx], 0x00);

    let routes = &edited[sea_route_start()..sea_route_start() + 6];
    assert!(routes.iter().any(|&b| b != 0), "sea routes were regenerated");
    assert_eq!(&edited[edited.len() - 2..], &[0x5A, 0xA5]);

    let _ = fs::remove_file(path);
    let _ = fs::remove_file(out);
}

#[test]
fn regenerated_routes_are_visible_when_reopened() {
    let path = fixture_path("colsav_regen");
    let out = temp_path("colsav_regen_out", "SAV");
    let output = run_cli(&[
        "--regenerate-routes",
        "--output",
        out.to_str().expect("utf-8 path"),
        path.to_str().expect("utf-8 path"),
    ]);
    assert!(output.status.success());

    let output = run_cli(&["--routes", "sea", "--json", out.to_str().expect("utf-8 path")]);
    assert!(output.status.success());
    let json: Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["routes"]["rows"], 2);
    assert_eq!(json["routes"]["cols"], 3);
    let top_left = json["routes"]["blocks"][0][0]
        .as_u64()
        .expect("route byte");
    assert_ne!(top_left & 0x04, 0, "east link from the top-left block");

    let _ = fs::remove_file(path);
    let _ = fs::remove_file(out);
}

#[test]
fn json_output_reflects_edits() {
    let path = fixture_path("colsav_edit_json");
    let out = temp_path("colsav_edit_json_out", "SAV");
    let output = run_cli(&[
        "--set-prime",
        "3",
        "--reset-rumors",
        "--json",
        "--output",
        out.to_str().expect("utf-8 path"),
        path.to_str().expect("utf-8 path"),
    ]);
    assert!(output.status.success());
    let json: Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["prime"], 3);

    let edited = fs::read(&out).expect("edited save should exist");
    assert_eq!(edited[prime_lcr_offset()], 0x03);

    let _ = fs::remove_file(path);
    let _ = fs::remove_file(out);
}

#[test]
fn export_writes_map_file() {
    let path = fixture_path("colsav_export");
    let mp = temp_path("colsav_export_out", "MP");
    let output = run_cli(&[
        "--export-mp",
        mp.to_str().expect("utf-8 path"),
        path.to_str().expect("utf-8 path"),
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Wrote map to"), "{stdout}");

    let bytes = fs::read(&mp).expect("map file should exist");
    assert_eq!(bytes.len(), 6 + 3 * WIDTH * HEIGHT);
    assert_eq!(&bytes[..6], &[12, 0, 8, 0, 4, 0]);
    assert_eq!(bytes[6 + 2 * WIDTH + 2], 3);
    assert_eq!(bytes[6 + 2 * WIDTH * HEIGHT], 0);
    assert_eq!(bytes[6 + 2 * WIDTH * HEIGHT + WIDTH + 1], 1);

    let _ = fs::remove_file(path);
    let _ = fs::remove_file(mp);
}
