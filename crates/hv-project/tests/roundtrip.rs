use hv_project::schema::*;
use hv_project::{build_vessel, load_json, load_yaml, save_json, save_yaml, validate_project};

fn accumulator_project() -> VesselProject {
    VesselProject {
        version: 1,
        name: "Accumulator".to_string(),
        vessel: VesselDef {
            name: "acc".to_string(),
            geometry: GeometryDef::Shell {
                total_volume_m3: 0.001,
                inner_diameter_m: 0.1,
            },
            liquid: LiquidDef::HydraulicOil,
            cushion: CushionDef::Nitrogen {
                filled_pressure_pa: 5e6,
                eos: GasModelDef::VanDerWaals,
                start_pressure_pa: None,
                temperature_k: Some(293.15),
                rest_pressure_pa: None,
            },
            ports: vec![PortDef {
                name: "oil".to_string(),
                height_m: 0.0,
                resistance: Some(ResistanceDef {
                    diameter_m: 0.01,
                    zeta_in: 0.6,
                    zeta_out: 1.2,
                }),
                boundary: PortBoundaryDef::Table {
                    points: vec![[0.0, 0.0], [1.0, 0.05]],
                },
            }],
            initialization: InitializationDef {
                policy: InitializationPolicyDef::FixedInitial,
                start_extent: 1e-6,
            },
            energy_dynamics: EnergyDynamicsDef::Dynamic,
            single_state_medium: false,
        },
        ambient: AmbientDef::default(),
        run: RunDef::default(),
    }
}

#[test]
fn roundtrip_yaml_accumulator() {
    let project = accumulator_project();
    validate_project(&project).unwrap();

    let path = std::env::temp_dir().join("hv_project_roundtrip_accumulator.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_json_accumulator() {
    let project = accumulator_project();

    let path = std::env::temp_dir().join("hv_project_roundtrip_accumulator.json");
    save_json(&path, &project).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn minimal_yaml_fills_defaults() {
    let yaml = r#"
version: 1
name: Minimal
vessel:
  name: tank
  geometry: { type: Prismatic, height_m: 2.0, cross_area_m2: 0.5 }
  liquid: { type: Water }
"#;
    let project: VesselProject = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(project.vessel.cushion, CushionDef::None);
    assert!(project.vessel.ports.is_empty());
    assert_eq!(
        project.vessel.initialization.policy,
        InitializationPolicyDef::FixedInitial
    );
    assert_eq!(project.ambient.pressure_pa, 101_325.0);
    assert_eq!(project.run.record_every, 1);
    validate_project(&project).unwrap();
}

#[test]
fn cushion_eos_defaults_to_coolprop() {
    let yaml = r#"
version: 1
name: Accumulator
vessel:
  name: acc
  geometry: { type: Shell, total_volume_m3: 0.001, inner_diameter_m: 0.1 }
  liquid: { type: HydraulicOil }
  cushion: { type: Nitrogen, filled_pressure_pa: 5.0e6 }
  initialization: { policy: FixedInitial, start_extent: 1.0e-6 }
"#;
    let mut project: VesselProject = serde_yaml::from_str(yaml).unwrap();
    let vessel = build_vessel(&project).unwrap();
    assert_eq!(vessel.cushion().unwrap().model().name(), "CoolProp");

    if let CushionDef::Nitrogen { eos, .. } = &mut project.vessel.cushion {
        *eos = GasModelDef::IdealGas;
    }
    let vessel = build_vessel(&project).unwrap();
    assert_eq!(vessel.cushion().unwrap().model().name(), "ideal-gas");
}
