use super::*;

#[test]
fn defaults_match_the_reference_build() {
    let eb = EffectboxConfig::default();
    assert_eq!(eb.fps.as_f64(), 10.0);
    assert_eq!(eb.device, DeviceType::Tesseract);
    assert_eq!(eb.transition, 60.0);
    assert_eq!(eb.frame_addr, "tcp://127.0.0.1:5556");
    assert_eq!(eb.animation_kinds().unwrap(), DEFAULT_ANIMATIONS);
    eb.validate().unwrap();

    let hw = HardwareConfig::default();
    assert_eq!(hw.chips, 5);
    assert_eq!(hw.spi.speed_hz, 500_000);
    assert_eq!(hw.polarity(), Polarity::Inverted);
    hw.validate().unwrap();
}

#[test]
fn partial_toml_fills_in_defaults() {
    let hw: HardwareConfig = toml::from_str(
        r#"
        chips = 6
        inverted = false
        poll = "per-layer"
        blank_mode = "during-load"

        [spi]
        speed_hz = 1000000
        "#,
    )
    .unwrap();
    assert_eq!(hw.chips, 6);
    assert_eq!(hw.polarity(), Polarity::Normal);
    assert_eq!(hw.poll, PollMode::PerLayer);
    assert_eq!(hw.blank_mode, BlankMode::DuringLoad);
    assert_eq!(hw.spi.bus, 0);
    assert_eq!(hw.spi.speed_hz, 1_000_000);
    assert_eq!(hw.pins, PinConfig::default());
}

#[test]
fn effectbox_toml_resolves_devices_and_animations() {
    let eb: EffectboxConfig = toml::from_str(
        r#"
        fps = 25.0
        device = "minicube"
        animations = ["fxyt", "starfield"]
        "#,
    )
    .unwrap();
    assert_eq!(eb.device, DeviceType::Minicube);
    assert_eq!(
        eb.animation_kinds().unwrap(),
        vec![AnimationKind::FxytMexicanHat, AnimationKind::Starfield]
    );
    assert!(toml::from_str::<EffectboxConfig>(r#"device = "hypercube""#).is_err());
    assert!(toml::from_str::<EffectboxConfig>("fps = -1.0").is_err());
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(toml::from_str::<HardwareConfig>("chipz = 5").is_err());
}

#[test]
fn hardware_validation() {
    let bad = |f: fn(&mut HardwareConfig)| {
        let mut cfg = HardwareConfig::default();
        f(&mut cfg);
        matches!(cfg.validate(), Err(TessledError::Config(_)))
    };
    assert!(bad(|c| c.chips = 4));
    assert!(bad(|c| c.pins.xlat = c.pins.blank));
    assert!(bad(|c| c.spi.speed_hz = 0));
    assert!(bad(|c| c.dot_correction = Some(64)));
    assert!(bad(|c| c.frame_addr = "localhost".to_owned()));
    assert!(!bad(|c| c.dot_correction = Some(63)));
}

#[test]
fn effectbox_validation() {
    let mut cfg = EffectboxConfig {
        transition: 0.0,
        ..EffectboxConfig::default()
    };
    assert!(cfg.validate().is_err());
    cfg.transition = 5.0;
    cfg.animations = vec!["nope".to_owned()];
    assert!(cfg.validate().is_err());
}

#[test]
fn missing_file_is_a_config_error() {
    let err = HardwareConfig::from_toml_file(Path::new("/definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, TessledError::Config(_)));
}
