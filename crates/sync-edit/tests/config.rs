use pretty_assertions::assert_eq;
use std::io::Write;
use sync_edit::config::CUSTOM_PRESET;
use sync_edit::{
    CaretPlacement, ContinuationStrictness, HighlightStyle, MemoryEditor, RefreshPolicy, Rgba,
    SyncEditConfig, SyncEditError, SyncEditSession, WordClass, presets,
};

#[test]
fn test_load_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "color_preset: custom\n\
         word_text_color: \"#ff0000\"\n\
         region_background_color: \"#00ff0080\"\n\
         refresh_policy: static\n\
         continuation: lenient\n\
         caret_placement: token_start\n\
         word_class: ascii"
    )
    .unwrap();

    let config = SyncEditConfig::load(file.path()).unwrap();
    assert_eq!(config.word_text_color, Rgba::new(255, 0, 0, 255));
    assert_eq!(config.region_background_color, Rgba::new(0, 255, 0, 0x80));
    assert_eq!(config.refresh_policy, RefreshPolicy::Static);
    assert_eq!(config.continuation, ContinuationStrictness::Lenient);
    assert_eq!(config.caret_placement, CaretPlacement::TokenStart);
    assert_eq!(config.word_class, WordClass::Ascii);
}

#[test]
fn test_partial_yaml_keeps_defaults() {
    let config = SyncEditConfig::from_yaml_str("continuation: strict\n").unwrap();
    assert_eq!(
        config,
        SyncEditConfig {
            continuation: ContinuationStrictness::Strict,
            ..SyncEditConfig::default()
        }
    );
    assert_eq!(SyncEditConfig::from_yaml_str("  \n").unwrap(), SyncEditConfig::default());
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = SyncEditConfig::load(&dir.path().join("sync-edit.yaml")).unwrap();
    assert_eq!(config, SyncEditConfig::default());
}

#[test]
fn test_malformed_config_is_an_error() {
    let err = SyncEditConfig::from_yaml_str("word_text_color: \"red\"").unwrap_err();
    assert!(matches!(err, SyncEditError::Yaml(_)));

    let err = SyncEditConfig::from_yaml_str("refresh_policy: sometimes").unwrap_err();
    assert!(matches!(err, SyncEditError::Yaml(_)));
}

#[test]
fn test_yaml_round_trip() {
    let config = SyncEditConfig {
        color_preset: "ocean".to_string(),
        refresh_policy: RefreshPolicy::Static,
        caret_placement: CaretPlacement::TokenStart,
        ..SyncEditConfig::default()
    };
    let yaml = config.to_yaml_string().unwrap();
    assert!(yaml.contains("refresh_policy: static"));
    assert_eq!(SyncEditConfig::from_yaml_str(&yaml).unwrap(), config);
}

#[test]
fn test_preset_colors_reach_the_host() {
    let ocean = presets::lookup("ocean").unwrap();
    let mut editor = MemoryEditor::new("foo foo");
    editor.select(0, 7);
    let mut session = SyncEditSession::new(SyncEditConfig {
        color_preset: "ocean".to_string(),
        ..SyncEditConfig::default()
    });
    session.start(&mut editor).unwrap();

    let styles: Vec<HighlightStyle> = editor.highlights().values().map(|h| h.style).collect();
    assert_eq!(
        styles,
        vec![
            HighlightStyle::foreground(ocean.word_text),
            HighlightStyle::background(ocean.region_background),
        ]
    );
}

#[test]
fn test_unknown_preset_falls_back_to_explicit_colors() {
    let config = SyncEditConfig {
        color_preset: "no-such-preset".to_string(),
        word_text_color: Rgba::new(9, 9, 9, 255),
        ..SyncEditConfig::default()
    };
    let colors = config.resolve_colors();
    assert_eq!(colors.word_text, Rgba::new(9, 9, 9, 255));
    assert_eq!(colors.region_background, config.region_background_color);
    assert_ne!(config.color_preset, CUSTOM_PRESET);
}

#[test]
fn test_token_start_placement() {
    let mut editor = MemoryEditor::new("foo bar foo");
    editor.select(0, 11);
    let mut session = SyncEditSession::new(SyncEditConfig {
        caret_placement: CaretPlacement::TokenStart,
        ..SyncEditConfig::default()
    });
    session.start(&mut editor).unwrap();
    assert_eq!(editor.selection_offsets_all(), vec![(3, 0), (11, 8)]);
}
