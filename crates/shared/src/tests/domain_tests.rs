use super::*;

fn colors_at(start_angle: f64) -> Vec<SectorColor> {
    let table = SectorTable::standard();
    let width = table.sector_width();
    table
        .arcs(start_angle)
        .filter(|arc| arc.start >= INDICATOR_ANGLE - width && arc.start < INDICATOR_ANGLE)
        .map(|arc| arc.sector.color)
        .collect()
}

#[test]
fn table_has_seven_sectors_in_drawing_order() {
    let table = SectorTable::standard();
    let colors: Vec<_> = table.iter().map(|sector| sector.color).collect();

    assert_eq!(table.len(), SECTOR_COUNT);
    assert_eq!(colors, SectorColor::ALL.to_vec());
}

#[test]
fn result_kind_is_fixed_per_color() {
    let table = SectorTable::standard();
    for sector in table.iter() {
        assert_eq!(sector.result_kind, sector.color.result_kind());
        assert_eq!(sector.display_text, sector.color.label());
    }

    assert_eq!(table.get(SectorColor::Red).result_kind, ResultKind::Text);
    assert_eq!(table.get(SectorColor::Orange).result_kind, ResultKind::Image);
    assert_eq!(table.get(SectorColor::DarkBlue).result_kind, ResultKind::Image);
    assert_eq!(table.get(SectorColor::LightBlue).display_text, "LIGHT BLUE");
}

#[test]
fn arcs_wrap_into_a_full_turn() {
    let table = SectorTable::standard();
    let arcs: Vec<_> = table.arcs(350.0).collect();

    assert!(arcs.iter().all(|arc| (0.0..FULL_ROTATION).contains(&arc.start)));
    assert!((arcs[1].start - (350.0 + table.sector_width() - FULL_ROTATION)).abs() < 1e-9);
    let total: f64 = arcs.iter().map(|arc| arc.sweep).sum();
    assert!((total - FULL_ROTATION).abs() < 1e-9);
}

#[test]
fn every_reachable_angle_matches_exactly_one_sector() {
    for step in 0..36 {
        let angle = normalize_angle(270.0 + f64::from(step) * 10.0);
        assert_eq!(colors_at(angle).len(), 1, "angle {angle}");
        assert!(SectorTable::standard().sector_at(angle).is_some());
    }
}

#[test]
fn winning_sector_is_the_one_under_the_indicator() {
    let table = SectorTable::standard();
    let cases = [
        (0.0, SectorColor::DarkBlue),
        (20.0, SectorColor::LightBlue),
        (100.0, SectorColor::Green),
        (110.0, SectorColor::Green),
        (150.0, SectorColor::Yellow),
        (190.0, SectorColor::Orange),
        (270.0, SectorColor::Violet),
        (310.0, SectorColor::Violet),
        (350.0, SectorColor::DarkBlue),
    ];

    for (angle, expected) in cases {
        let sector = table.sector_at(angle).expect("sector");
        assert_eq!(sector.color, expected, "angle {angle}");
    }
}

#[test]
fn normalize_angle_handles_rollover() {
    assert_eq!(normalize_angle(360.0), 0.0);
    assert_eq!(normalize_angle(370.0), 10.0);
    assert_eq!(normalize_angle(-10.0), 350.0);
    assert!(normalize_angle(-1e-18) < FULL_ROTATION);
}
