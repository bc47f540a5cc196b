use prefab::{CapabilityKey, Manifest, ManifestLoader, RegistryBuilder, Resolved};

trait Formatter: Send + Sync {
    fn format(&self, value: &str) -> String;
}

struct UpperFormatter;

impl Formatter for UpperFormatter {
    fn format(&self, value: &str) -> String {
        value.to_uppercase()
    }
}

/// Full population-then-consumption pipeline: programmatic registration,
/// declarative manifests, freeze, resolution.
#[test]
fn test_two_phase_pipeline() {
    let mut builder = RegistryBuilder::new();
    let key = builder.declare_capability::<Box<dyn Formatter>>();
    builder.register::<Box<dyn Formatter>, _>(|| Box::new(UpperFormatter) as Box<dyn Formatter>);

    let yaml = format!(
        "capabilities:\n  \"{}\":\n    - formatters.SnakeFormatter\n    - formatters.KebabFormatter\n",
        key.type_name()
    );
    let manifest = Manifest::from_yaml(&yaml).unwrap();
    let report = ManifestLoader::new().apply(&manifest, &mut builder).unwrap();
    assert_eq!(report.applied, 2);

    let registry = builder.freeze();
    let resolved = registry.resolve_typed::<Box<dyn Formatter>>().unwrap();
    assert_eq!(resolved.len(), 3);

    match &resolved[0] {
        Resolved::Instance(formatter) => assert_eq!(formatter.format("hi"), "HI"),
        Resolved::Deferred(name) => panic!("expected live instance first, got {}", name),
    }
    assert_eq!(resolved[1].deferred_name(), Some("formatters.SnakeFormatter"));
    assert_eq!(resolved[2].deferred_name(), Some("formatters.KebabFormatter"));
}

#[test]
fn test_unregistered_capability_resolves_empty() {
    let registry = RegistryBuilder::new().freeze();
    let key = CapabilityKey::of::<Box<dyn Formatter>>();
    assert_eq!(registry.resolve(key).count(), 0);
}

#[test]
fn test_gate_detection_matches_compiled_feature() {
    if std::env::var(prefab::BUILDTOOLS_ENV).is_ok() {
        return;
    }
    let gate = prefab::detect_buildtools();
    assert_eq!(gate.is_present(), prefab::buildtools_compiled_in());
}

#[cfg(feature = "buildtools")]
mod with_buildtools {
    use super::*;
    use prefab::buildtools::{RegistrationGenerator, StaticFactories};
    use prefab::BuildtoolsGate;

    #[test]
    fn test_capture_and_codegen_round_trip() {
        let mut builder = RegistryBuilder::new();
        let key = builder.declare_capability::<Box<dyn Formatter>>();
        builder.register_name(key, "formatters.SnakeFormatter").unwrap();
        let registry = builder.freeze();

        let captured = StaticFactories::capture(&registry, &BuildtoolsGate::present("0.3.0"));
        let dir = tempfile::tempdir().unwrap();
        let path = RegistrationGenerator::new(dir.path())
            .generate(&captured)
            .unwrap()
            .unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("formatters.SnakeFormatter"));
    }

    #[test]
    fn test_absent_gate_is_inert_end_to_end() {
        let registry = RegistryBuilder::new().freeze();
        let captured =
            StaticFactories::capture(&registry, &BuildtoolsGate::absent("marked absent"));
        assert!(captured.is_disabled());

        let dir = tempfile::tempdir().unwrap();
        let generated = RegistrationGenerator::new(dir.path())
            .generate(&captured)
            .unwrap();
        assert!(generated.is_none());
    }
}
