//! End-to-end scenarios: vessels integrated under port boundary sources.

use std::sync::Arc;

use hv_core::units::{k, m, m2, m3, pa};
use hv_fluids::IdealGas;
use hv_sim::{
    ClosedPort, FlowRamp, FlowTable, IntegratorType, MassFlowSource, OrificeSource, PortBoundary,
    SimError, SimOptions, TransientModel, VesselModel, run_sim,
};
use hv_vessel::{
    BalanceOutputs, EnergyDynamics, GasCushion, InitializationPolicy, Port, PortResistance, Regime,
    VesselBuilder, VesselError,
};

fn opts(dt: f64, t_end: f64) -> SimOptions {
    SimOptions {
        dt,
        t_end,
        record_every: 1,
        ..SimOptions::default()
    }
}

fn accumulator_model(inflow: f64, dynamics: EnergyDynamics) -> VesselModel {
    let vessel = VesselBuilder::nitrogen_accumulator(m3(0.001), m(0.1), pa(5e6), 1e-6)
        .unwrap()
        .port(Port::new("oil", m(0.0)))
        .energy_dynamics(dynamics)
        .build()
        .unwrap();
    let source: Box<dyn PortBoundary> = Box::new(MassFlowSource::new(inflow).unwrap());
    VesselModel::new(vessel, vec![source]).unwrap()
}

#[test]
fn open_tank_at_rest_keeps_its_level() {
    let vessel = VesselBuilder::open_tank(m(1.0), m2(1.0), 0.5)
        .port(Port::new("drain", m(0.0)))
        .build()
        .unwrap();
    let mut model = VesselModel::new(vessel, vec![Box::new(ClosedPort)]).unwrap();
    let record = run_sim(&mut model, &opts(0.1, 10.0)).unwrap();

    assert!(record.x.iter().all(|x| x.extent == 0.5));
    assert!(record.events.is_empty());
    let outputs = model.sample_outputs(&record).unwrap();
    for out in &outputs {
        assert_eq!(out.regime, Regime::Ambient);
        assert_eq!(out.liquid_pressure_pa, 101_325.0);
        assert!(out.gas.is_none());
    }
}

#[test]
fn accumulator_at_rest_holds_fill_pressure() {
    let mut model = accumulator_model(0.0, EnergyDynamics::Dynamic);
    let record = run_sim(&mut model, &opts(0.01, 1.0)).unwrap();

    assert!(record.events.is_empty());
    assert!(record.x.iter().all(|x| x.extent == 1e-6));
    for out in model.sample_outputs(&record).unwrap() {
        assert_eq!(out.regime, Regime::Rest);
        let gas = out.gas.unwrap();
        assert_eq!(gas.pressure_pa, 5e6);
        assert!(out.liquid_pressure_pa <= 5e6);
    }
}

#[test]
fn accumulator_inflow_compresses_the_cushion() {
    // 1e-4 m³/s of oil
    let mut model = accumulator_model(0.087, EnergyDynamics::Dynamic);
    let record = run_sim(&mut model, &opts(0.01, 2.0)).unwrap();

    assert_eq!(record.events.len(), 1);
    assert!(record.events[0] < 0.01);
    assert_eq!(model.regime(), Regime::Compression);

    let outputs = model.sample_outputs(&record).unwrap();
    for w in outputs.windows(2) {
        assert!(w[1].gas_volume_m3 < w[0].gas_volume_m3);
    }
    for out in outputs.iter().skip(1) {
        let gas = out.gas.unwrap();
        assert_eq!(out.regime, Regime::Compression);
        assert_eq!(gas.pressure_pa, out.liquid_pressure_pa);
    }
    let last = outputs.last().unwrap();
    assert!(last.gas.unwrap().pressure_pa > 6e6);
    assert!((record.x.last().unwrap().extent - (1e-6 + 2e-4)).abs() < 1e-9);
}

fn assert_regime_consistent(outputs: &[BalanceOutputs], threshold: f64) {
    for out in outputs {
        let gas = out.gas.as_ref().unwrap();
        match out.regime {
            Regime::Compression => {
                assert_eq!(gas.pressure_pa, out.liquid_pressure_pa);
                assert!(gas.pressure_pa > threshold);
            }
            Regime::Rest => {
                assert_eq!(gas.pressure_pa, threshold);
                assert!(out.liquid_pressure_pa <= threshold);
            }
            Regime::Ambient => panic!("ambient regime on an accumulator"),
        }
    }
}

/// Accumulator with a throttled oil port fed from a reservoir at `p_res`.
fn throttled_accumulator(p_start: f64, v_oil_start: f64, p_res: f64) -> VesselModel {
    let cushion = GasCushion::nitrogen(pa(5e6), k(293.15))
        .unwrap()
        .with_start_pressure(pa(p_start));
    let vessel = VesselBuilder::nitrogen_accumulator(m3(0.001), m(0.1), pa(5e6), v_oil_start)
        .unwrap()
        .cushion(cushion)
        .port(
            Port::new("oil", m(0.0))
                .with_resistance(PortResistance::new(m(0.01), 1.0, 1.0).unwrap()),
        )
        .build()
        .unwrap();
    let source: Box<dyn PortBoundary> = Box::new(OrificeSource::new(p_res).unwrap());
    VesselModel::new(vessel, vec![source]).unwrap()
}

#[test]
fn discharge_step_past_the_switch_is_cut_back() {
    // Compressed to 5.5 MPa and drained to an ambient reservoir: a full step
    // of 0.05 s under compression would empty the vessel, but the gas
    // reaches its fill pressure first and the flow stops at rest.
    let mut model = throttled_accumulator(5.5e6, 1e-4, 101_325.0);
    let record = run_sim(&mut model, &opts(0.05, 0.5)).unwrap();

    assert_eq!(record.events.len(), 1);
    assert!(record.events[0] < 0.05);
    assert_eq!(model.regime(), Regime::Rest);
    assert!((record.t.last().unwrap() - 0.5).abs() < 1e-12);

    let last = record.x.last().unwrap().extent;
    assert!(last > 1e-5 && last < 1e-4, "extent {last}");
    assert!(record.x.iter().all(|x| x.extent > 0.0));

    let outputs = model.sample_outputs(&record).unwrap();
    assert_regime_consistent(&outputs, 5e6);
    let at_rest = outputs.last().unwrap();
    assert!((at_rest.gas.as_ref().unwrap().eos.p.value - 5e6).abs() / 5e6 < 1e-5);
}

#[test]
fn chattering_between_rest_and_compression_is_an_error() {
    // The reservoir sits between the rest pressure and the fill pressure, so
    // each regime drives the gas straight back across the threshold.
    let mut model = throttled_accumulator(5e6, 1e-6, 3e6);
    let err = run_sim(&mut model, &opts(1e-3, 0.1)).unwrap_err();
    assert!(matches!(err, SimError::EventChatter { .. }), "{err:?}");
}

#[test]
fn run_short_of_step_budget_is_an_error() {
    let mut model = accumulator_model(0.05, EnergyDynamics::Dynamic);
    let err = run_sim(
        &mut model,
        &SimOptions {
            max_steps: 10,
            ..opts(0.01, 1.0)
        },
    )
    .unwrap_err();
    assert!(matches!(err, SimError::StepLimit { max_steps: 10, .. }), "{err:?}");
}

#[test]
fn charge_then_discharge_returns_to_rest() {
    // 1e-4 m³ in over the first second, 1.3e-4 m³ out afterwards
    let table = FlowTable::new(vec![
        (0.0, 0.087),
        (1.0, 0.087),
        (1.2, -0.087),
        (2.4, -0.087),
        (2.6, 0.0),
    ])
    .unwrap();
    let vessel = VesselBuilder::nitrogen_accumulator(m3(0.001), m(0.1), pa(5e6), 1e-4)
        .unwrap()
        .port(Port::new("oil", m(0.0)))
        .build()
        .unwrap();
    let mut model = VesselModel::new(vessel, vec![Box::new(table)]).unwrap();
    let record = run_sim(&mut model, &opts(0.01, 3.0)).unwrap();

    assert_eq!(record.events.len(), 2, "events {:?}", record.events);
    assert!(record.events[0] < 0.01);
    assert!((record.events[1] - 2.2).abs() < 0.01, "events {:?}", record.events);
    assert_eq!(model.regime(), Regime::Rest);

    let outputs = model.sample_outputs(&record).unwrap();
    assert_regime_consistent(&outputs, 5e6);

    let back = record
        .t
        .iter()
        .position(|t| *t == record.events[1])
        .unwrap();
    let gas = outputs[back].gas.as_ref().unwrap();
    assert_eq!(outputs[back].regime, Regime::Rest);
    assert_eq!(gas.pressure_pa, 5e6);
    assert!((gas.eos.p.value - 5e6).abs() / 5e6 < 1e-5);
    assert!((record.x[back].extent - 1e-4).abs() < 1e-8);

    let last = record.x.last().unwrap();
    assert!((last.extent - 0.7e-4).abs() < 1e-7);
    assert!(outputs.last().unwrap().gas.as_ref().unwrap().eos.p.value < 5e6);
}

#[test]
fn gas_mass_is_conserved_exactly() {
    let mut model = accumulator_model(0.05, EnergyDynamics::Dynamic);
    let record = run_sim(&mut model, &opts(0.01, 1.0)).unwrap();
    let m0 = record.x[0].gas_mass_kg;
    assert!(m0 > 0.0);
    assert!(record.x.iter().all(|x| x.gas_mass_kg == m0));
}

#[test]
fn steady_energy_dynamics_freeze_gas_energy() {
    let mut model = accumulator_model(0.05, EnergyDynamics::SteadyState);
    let record = run_sim(&mut model, &opts(0.01, 1.0)).unwrap();
    let e0 = record.x[0].gas_energy_j;
    assert!(record.x.iter().all(|x| x.gas_energy_j == e0));
    for x in &record.x {
        let regime = model.vessel().select_regime(x).unwrap();
        let (_, d) = model.evaluate(0.0, x, regime).unwrap();
        assert_eq!(d.wb_flow_w, 0.0);
        assert_eq!(d.state.gas_energy_j, 0.0);
    }
}

#[test]
fn overfilling_the_accumulator_is_fatal() {
    let mut model = accumulator_model(5.0, EnergyDynamics::Dynamic);
    let err = run_sim(&mut model, &opts(0.01, 5.0)).unwrap_err();
    assert!(
        matches!(
            err,
            SimError::Vessel(VesselError::GeometricViolation { .. })
                | SimError::Vessel(VesselError::Fluid(_))
        ),
        "{err:?}"
    );
}

#[test]
fn draining_an_open_tank_below_empty_is_fatal() {
    let vessel = VesselBuilder::open_tank(m(1.0), m2(1.0), 0.1)
        .port(Port::new("drain", m(0.0)))
        .build()
        .unwrap();
    let mut model =
        VesselModel::new(vessel, vec![Box::new(MassFlowSource::new(-100.0).unwrap())]).unwrap();
    let err = run_sim(&mut model, &opts(0.1, 10.0)).unwrap_err();
    assert!(matches!(
        err,
        SimError::Vessel(VesselError::GeometricViolation { .. })
    ));
}

#[test]
fn fixed_initial_reproduces_start_extent() {
    let vessel = VesselBuilder::open_tank(m(2.0), m2(0.5), 0.75)
        .port(Port::new("in", m(0.0)))
        .build()
        .unwrap();
    let mut model = VesselModel::new(
        vessel,
        vec![Box::new(FlowRamp::new(0.0, 1.0, 0.0, 1.0).unwrap())],
    )
    .unwrap();
    assert_eq!(model.initial_state().unwrap().extent, 0.75);
}

#[test]
fn steady_state_initial_balances_the_air_cushion_tank() {
    let r = PortResistance::new(m(0.05), 0.5, 1.0).unwrap();
    let rho: f64 = 998.2;
    let zeta_in = 0.5;
    let area = r.area().value;
    // inflow through the orifice equals the drain at 2.2 bar cushion pressure
    let q = area * (2.0 * rho * (2.5e5 - 2.2e5) / zeta_in).sqrt();

    // closed-form ideal air keeps the squeeze exactly isothermal
    let ideal_air = GasCushion::air(pa(101_325.0), k(293.15))
        .unwrap()
        .with_start_pressure(pa(2e5))
        .with_model(Arc::new(IdealGas::air()));
    let vessel = VesselBuilder::air_cushion_tank(m(4.0), m2(2.0), pa(2e5), 1.0, r)
        .unwrap()
        .cushion(ideal_air)
        .policy(InitializationPolicy::SteadyStateInitial)
        .build()
        .unwrap();
    let boundaries: Vec<Box<dyn PortBoundary>> = vec![
        Box::new(OrificeSource::new(2.5e5).unwrap()),
        Box::new(MassFlowSource::new(-q).unwrap()),
    ];
    let mut model = VesselModel::new(vessel, boundaries).unwrap();

    let x0 = model.initial_state().unwrap();
    let d = model.rhs(0.0, &x0).unwrap();
    assert!(d.extent.abs() < 1e-9);
    // same air charge, isothermal squeeze from 6 m³ at 2 bar to 2.2 bar
    let expected_level = (8.0 - 6.0 * 2e5 / 2.2e5) / 2.0;
    assert!((x0.extent - expected_level).abs() < 1e-6);

    let record = run_sim(&mut model, &opts(0.01, 1.0)).unwrap();
    let last = record.x.last().unwrap();
    assert!((last.extent - x0.extent).abs() < 1e-6);
}

#[test]
fn forward_euler_matches_rk4_for_constant_inflow() {
    let vessel = || {
        VesselBuilder::open_tank(m(1.0), m2(1.0), 0.2)
            .port(Port::new("in", m(0.0)))
            .build()
            .unwrap()
    };
    let mut a = VesselModel::new(vessel(), vec![Box::new(MassFlowSource::new(9.982).unwrap())])
        .unwrap();
    let mut b = VesselModel::new(vessel(), vec![Box::new(MassFlowSource::new(9.982).unwrap())])
        .unwrap();
    let ra = run_sim(&mut a, &opts(0.5, 10.0)).unwrap();
    let rb = run_sim(
        &mut b,
        &SimOptions {
            integrator: IntegratorType::ForwardEuler,
            ..opts(0.5, 10.0)
        },
    )
    .unwrap();
    let xa = ra.x.last().unwrap().extent;
    let xb = rb.x.last().unwrap().extent;
    assert!((xa - 0.3).abs() < 1e-12);
    assert!((xa - xb).abs() < 1e-12);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn every_sample_closes_volume_and_pressure(q in -0.05_f64..0.1) {
            let vessel = VesselBuilder::nitrogen_accumulator(m3(0.001), m(0.1), pa(5e6), 3e-4)
                .unwrap()
                .port(Port::new("oil", m(0.0)))
                .build()
                .unwrap();
            let source: Box<dyn PortBoundary> = Box::new(MassFlowSource::new(q).unwrap());
            let mut model = VesselModel::new(vessel, vec![source]).unwrap();
            let record = run_sim(&mut model, &opts(0.01, 1.0)).unwrap();

            for out in model.sample_outputs(&record).unwrap() {
                prop_assert!((out.liquid_volume_m3 + out.gas_volume_m3 - 1e-3).abs() < 1e-15);
                let gas = out.gas.unwrap();
                match out.regime {
                    Regime::Compression => {
                        prop_assert_eq!(gas.pressure_pa, out.liquid_pressure_pa);
                        prop_assert!(gas.pressure_pa > 5e6);
                    }
                    Regime::Rest => prop_assert_eq!(gas.pressure_pa, 5e6),
                    Regime::Ambient => prop_assert!(false, "ambient regime on an accumulator"),
                }
            }
        }
    }
}
