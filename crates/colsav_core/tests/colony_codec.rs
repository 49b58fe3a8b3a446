use colsav_core::error::{EditError, FormatError};
use colsav_core::power::Power;
use colsav_core::sav::buildings::{
    BUILDINGS, Building, BuildingGroup, BuildingSet, Fortification,
};
use colsav_core::sav::colony::Colony;

fn record() -> Vec<u8> {
    let mut rec = vec![0u8; 0xCA];
    rec[0] = 17;
    rec[1] = 9;
    rec[2..12].copy_from_slice(b"Jamestown\0");
    rec[12] = b'X';
    rec[0x1A] = 2;
    rec[0x1F] = 6;
    rec[0x20] = 4;
    rec[0x40] = 0x1B;
    rec[0x60] = 0x52;
    rec[0x70..0x78].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
    rec[0x84] = 0x01 | 0x02 | 0x40;
    rec[0x85] = 0x02 | 0x0C;
    rec[0x8A..0x8C].copy_from_slice(&0x0102u16.to_le_bytes());
    rec[0x92..0x94].copy_from_slice(&300u16.to_le_bytes());
    rec[0x94] = 7;
    rec[0x9A..0x9C].copy_from_slice(&150u16.to_le_bytes());
    rec[0xB8..0xBA].copy_from_slice(&50u16.to_le_bytes());
    rec[0xC2..0xC4].copy_from_slice(&42u16.to_le_bytes());
    rec[0xC6..0xC8].copy_from_slice(&100u16.to_le_bytes());
    rec
}

#[test]
fn decodes_fixed_fields() {
    let colony = Colony::decode(&record()).expect("record should decode");
    assert_eq!((colony.row, colony.col), (9, 17));
    assert_eq!(colony.name, "Jamestown");
    assert_eq!(colony.power, Power::Spanish);
    assert_eq!(colony.population, 6);
    assert_eq!(colony.occupation[0], 4);
    assert_eq!(colony.specialty[0], 0x1B);
    assert_eq!(&colony.spot_time[..2], &[0x2, 0x5]);
    assert_eq!(colony.field, [1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(colony.exports, 0x0102);
    assert_eq!(colony.hammers, 300);
    assert_eq!(colony.construction, 7);
    assert_eq!(colony.cargo[0], 150);
    assert_eq!(colony.cargo[15], 50);
    assert_eq!(colony.sentiment, 42);
    assert_eq!(colony.sentiment_divisor, 100);
    assert!(!colony.modified);
}

#[test]
fn decodes_building_flags_and_fortification() {
    let colony = Colony::decode(&record()).expect("record should decode");
    assert!(colony.buildings.contains(Building::Stockade));
    assert!(colony.buildings.contains(Building::Fort));
    assert!(colony.buildings.contains(Building::Docks));
    assert!(colony.buildings.contains(Building::TownHall));
    assert!(!colony.buildings.contains(Building::Fortress));
    assert_eq!(colony.fortification(), Fortification::Fort);
    assert_eq!(colony.marker().tag(), "sfort");
}

#[test]
fn building_bytes_round_trip_with_unknown_bits() {
    let rec = record();
    let colony = Colony::decode(&rec).expect("record should decode");
    assert_eq!(colony.unknown_building_bits[1], 0x0C);
    assert_eq!(colony.building_bytes().as_slice(), &rec[0x84..0x8A]);
}

#[test]
fn short_record_is_truncation_error() {
    let rec = record();
    let err = Colony::decode(&rec[..0xC9]).expect_err("short record must fail");
    assert!(matches!(err, FormatError::Truncated { need: 0xCA, .. }));
}

#[test]
fn unknown_power_is_rejected() {
    let mut rec = record();
    rec[0x1A] = 9;
    assert_eq!(
        Colony::decode(&rec).expect_err("power 9 is not a European power"),
        FormatError::UnknownVariant {
            kind: "power",
            value: 9
        }
    );
}

#[test]
fn group_selection_sets_lower_tiers_and_clears_higher() {
    let mut set = BuildingSet::default();
    set.select(BuildingGroup::Fortification, Some(Building::Fortress))
        .expect("fortress is a fortification tier");
    assert!(set.contains(Building::Stockade));
    assert!(set.contains(Building::Fort));
    assert!(set.contains(Building::Fortress));

    set.select(BuildingGroup::Fortification, Some(Building::Stockade))
        .expect("stockade is a fortification tier");
    assert_eq!(set.level(BuildingGroup::Fortification), Some(Building::Stockade));
    assert!(!set.contains(Building::Fort));

    set.select(BuildingGroup::Fortification, None)
        .expect("fortification is optional");
    assert_eq!(set.fortification(), Fortification::None);
}

#[test]
fn mandatory_groups_cannot_be_emptied() {
    let mut set = BuildingSet::default();
    assert!(matches!(
        set.select(BuildingGroup::Rum, None),
        Err(EditError::NotApplicable(_))
    ));
    assert!(matches!(
        set.select(BuildingGroup::Rum, Some(Building::Church)),
        Err(EditError::WrongGroup { .. })
    ));
}

#[test]
fn group_consistent_sets_round_trip_through_bytes() {
    // Deterministic LCG so every run covers the same combinations.
    let mut state = 0x2545_F491_u32;
    let mut next = move || {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        state >> 16
    };

    for _ in 0..2_000 {
        let mut set = BuildingSet::default();
        for group in BuildingGroup::ALL {
            let tiers = group.tiers();
            let options = tiers.len() + usize::from(group.is_optional());
            let pick = next() as usize % options;
            let tier = if group.is_optional() {
                pick.checked_sub(1).map(|i| tiers[i])
            } else {
                Some(tiers[pick])
            };
            set.select(group, tier).expect("tier drawn from its own group");
        }
        set.set(Building::TownHall, next() % 2 == 0);

        let bytes = set.to_bytes();
        assert_eq!(BuildingSet::from_bytes(&bytes), set);
        assert_eq!(BuildingSet::from_bytes(&bytes).to_bytes(), bytes);
    }
}

#[test]
fn building_keys_resolve() {
    for info in &BUILDINGS {
        assert_eq!(Building::from_key(info.key), Ok(info.building));
    }
    assert_eq!(
        Building::from_key("palace"),
        Err(FormatError::UnknownName {
            kind: "building",
            name: "palace".to_string(),
        })
    );
    assert_eq!(
        Building::from_key("palace").map_err(|e| e.to_string()),
        Err("unknown building `palace`".to_string())
    );
    assert_eq!(Building::IronWorks.info().byte, 0x89);
    assert_eq!(Building::IronWorks.info().bit, 0x02);
}
