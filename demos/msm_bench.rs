// Copyright 2025 Irreducible Inc.

use std::{sync::Arc, time::Instant};

use anyhow::{ensure, Result};
use clap::{value_parser, Parser};
use rand::{rngs::StdRng, SeedableRng};
use zkaccel_curve::{CurveId, Representation};
use zkaccel_hal::make_backend;
use zkaccel_msm::{naive_msm, AccelerationHint, CalibrationConfig, MsmContext, MsmOptions};
use zkaccel_test_utils::fixtures::{random_points, random_scalars};
use zkaccel_utils::tracing::init_tracing;

#[derive(Debug, Parser)]
struct Args {
	/// Curve to run on: bn254 or bls12-381.
	#[arg(long, default_value = "bn254")]
	curve: CurveId,
	/// Binary logarithm of the number of points.
	#[arg(long, default_value_t = 12, value_parser = value_parser!(u32).range(0..=24))]
	log_size: u32,
	/// Where to run: cpu, gpu, hybrid or auto.
	#[arg(long, default_value = "auto")]
	hint: AccelerationHint,
	/// Benchmark the machine before running the MSM.
	#[arg(long)]
	calibrate: bool,
	/// Pippenger window width in bits; chosen from the input size when omitted.
	#[arg(long, value_parser = value_parser!(u32).range(1..=20))]
	window: Option<u32>,
	/// Also compute the naive sum and compare. Slow for large inputs.
	#[arg(long)]
	check: bool,
	#[arg(long, default_value_t = 0)]
	seed: u64,
}

fn main() -> Result<()> {
	let args = Args::parse();
	init_tracing();

	let ctx = MsmContext::new(Arc::new(make_backend()));
	let caps = ctx.capabilities();
	println!(
		"{} / {}: {} cores, simd: {}, matrix: {}, gpu: {}",
		caps.os,
		caps.arch,
		caps.cpu_core_count,
		caps.has_simd_ext,
		caps.has_matrix_coprocessor,
		caps.gpu_device_name.as_deref().unwrap_or("none"),
	);

	let curve = args.curve.config();
	if args.calibrate {
		let calibration = ctx.calibrate(curve, &CalibrationConfig::default())?;
		println!(
			"calibration: cpu {:.3} us/point, gpu {:.3} us/point, overhead {:.3} ms, gpu ratio {:.2}",
			calibration.cpu_time_per_point_us,
			calibration.gpu_time_per_point_us,
			calibration.gpu_dispatch_overhead_ms,
			calibration.optimal_gpu_ratio,
		);
	}

	let n = 1usize << args.log_size;
	let mut rng = StdRng::seed_from_u64(args.seed);
	let setup_scope = tracing::info_span!("Generating inputs", n).entered();
	let scalars = random_scalars(args.curve, n, &mut rng);
	let points = random_points(args.curve, n, Representation::Affine, &mut rng);
	drop(setup_scope);

	let options = MsmOptions {
		acceleration_hint: args.hint,
		window_size: args.window.map(|w| w as usize),
		..MsmOptions::from_env()
	};

	let start = Instant::now();
	let output = ctx.msm(&scalars, &points, curve, &options)?;
	let elapsed = start.elapsed();

	let report = &output.report;
	println!(
		"{n} points on {} via {}: {:.3} ms (cpu {} points / {:.3} ms, gpu {} points / {:.3} ms{})",
		args.curve,
		output.path,
		elapsed.as_secs_f64() * 1000.0,
		report.cpu_points,
		report.cpu_time_ms,
		report.gpu_points,
		report.gpu_time_ms,
		if report.gpu_fallback { ", GPU fell back to CPU" } else { "" },
	);

	if args.check {
		let expected = naive_msm(&scalars, &points, curve)?;
		ensure!(output.point() == expected, "MSM result differs from the naive sum");
		println!("result matches the naive sum");
	}

	Ok(())
}
