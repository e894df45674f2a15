use anyhow::{anyhow, Context, Result};
use maud::html;
use ndarray::Array4;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use revox_decoders::config::{LearnerConfig, LearnerKind};
use revox_decoders::data_handling::Session;
use revox_decoders::decoder::MaskedDecoder;
use revox_decoders::masker::{Masker, VolumeMasker};
use revox_decoders::models::search::log_grid;
use revox_decoders::report::plots::{plot_coefficient_slice, plot_score_histogram};
use revox_decoders::report::report::{Report, ReportSection};
use revox_decoders::stats::accuracy;

const SHAPE: (usize, usize, usize) = (6, 8, 6);
const RUNS: i32 = 10;
const SAMPLES_PER_RUN: usize = 6;

/// Build a synthetic two-condition session: a spherical "brain" of intensity
/// one over a dark background, with a small activation blob per condition.
fn synthetic_session(rng: &mut StdRng) -> Result<Session> {
    let n_samples = RUNS as usize * SAMPLES_PER_RUN;
    let (nx, ny, nz) = SHAPE;
    let center = ((nx - 1) as f32 / 2.0, (ny - 1) as f32 / 2.0, (nz - 1) as f32 / 2.0);

    let mut conditions = Vec::with_capacity(n_samples);
    let mut runs = Vec::with_capacity(n_samples);
    for run in 0..RUNS {
        for s in 0..SAMPLES_PER_RUN {
            conditions.push(if s % 2 == 0 { "face" } else { "house" }.to_string());
            runs.push(run);
        }
    }

    let mut volumes = Array4::zeros((n_samples, nx, ny, nz));
    for sample in 0..n_samples {
        let face = conditions[sample] == "face";
        for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    let brain = dist((i, j, k), center) <= 3.5;
                    if !brain {
                        continue;
                    }
                    let mut value = 1.0 + (rng.gen::<f32>() - 0.5) * 0.2;
                    let blob = if face { (2.0, 2.0, 2.0) } else { (4.0, 6.0, 4.0) };
                    if dist((i, j, k), blob) <= 1.3 {
                        value += 0.6;
                    }
                    volumes[(sample, i, j, k)] = value;
                }
            }
        }
    }

    Ok(Session::new(volumes, conditions, runs)?)
}

fn dist(voxel: (usize, usize, usize), to: (f32, f32, f32)) -> f32 {
    let dx = voxel.0 as f32 - to.0;
    let dy = voxel.1 as f32 - to.1;
    let dz = voxel.2 as f32 - to.2;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

fn add_decoder_section(
    report: &mut Report,
    title: &str,
    decoder: &MaskedDecoder<VolumeMasker>,
    test: &Session,
    y_test: &[i32],
    accuracy_pct: f32,
) -> Result<()> {
    let mut section = ReportSection::new(title);
    section.add_content(html! {
        p { (format!("Test accuracy: {:.1}%", accuracy_pct)) }
        p { code { (decoder.to_string()) } }
    });

    let scores = decoder.decision_function(&test.volumes)?;
    section.add_plot(
        plot_score_histogram(&scores, y_test, "face", "house", title).map_err(|e| anyhow!(e))?,
    );

    let map = decoder.coef_map().context("decoder has not been fitted")?;
    let cut = map.dim().2 / 2;
    section.add_plot(
        plot_coefficient_slice(map, 2, cut, &format!("{}: coefficient map, z cut {}", title, cut))
            .map_err(|e| anyhow!(e))?,
    );

    report.add_section(section);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(42);
    let session = synthetic_session(&mut rng)?;
    session.log_summary();

    // Restrict to the two conditions of interest and split by run
    let session = session.restrict(&["face", "house"]);
    let (train, test) = session.split_by_run(6);
    let y_train = train.binary_targets("face", "house")?;
    let y_test = test.binary_targets("face", "house")?;
    println!(
        "Training on {} samples, testing on {}",
        train.n_samples(),
        test.n_samples()
    );

    // Background mask computed from the mean training volume
    let background = train.mean_volume().context("empty training session")?;
    let masker = VolumeMasker::from_background(&background, 0.5).standardize(true);
    println!("Masker: {}", masker.describe());

    let mut report = Report::new(
        "Face vs house decoding",
        "0.1.0",
        None,
        "Synthetic two-condition decoding session",
    );
    let mut intro = ReportSection::new("Introduction");
    intro.add_content(html! {
        "Linear decoders discriminating two visual categories on a synthetic "
        "session. Each decoder is fitted on runs 0 to 6 and evaluated on the "
        "remaining runs; coefficient maps are unmasked back into the volume."
    });
    report.add_section(intro);

    // Sparse decoder with univariate screening
    let config = LearnerConfig::new(
        2000,
        LearnerKind::SparseLinear {
            penalty: 0.05,
            l1_ratio: 1.0,
            screening_percentile: 20.0,
        },
    );
    let mut decoder = MaskedDecoder::new(config, masker.clone())?;
    decoder.fit(&train.volumes, &y_train)?;
    let y_pred = decoder.predict(&test.volumes)?;
    let acc = accuracy(&y_pred, &y_test) * 100.0;
    println!("Sparse decoder classification accuracy : {}%", acc);
    add_decoder_section(&mut report, "Sparse (lasso) decoder", &decoder, &test, &y_test, acc)?;

    // Grid-searched wrapped learners over a log-spaced penalty grid
    let grid = log_grid(1.0, 1e-3, 5);
    let candidates = [
        (
            "ridge",
            LearnerKind::SparseLinear {
                penalty: 1.0,
                l1_ratio: 0.0,
                screening_percentile: 100.0,
            },
        ),
        ("logistic", LearnerKind::Logistic { alpha: 1.0 }),
    ];

    for (label, base) in candidates {
        let config = LearnerConfig::new(
            2000,
            LearnerKind::GridSearch {
                base: Box::new(base),
                penalty_grid: grid.clone(),
            },
        );
        let mut decoder = MaskedDecoder::new(config, masker.clone())?;
        decoder.fit(&train.volumes, &y_train)?;
        let y_pred = decoder.predict(&test.volumes)?;
        let acc = accuracy(&y_pred, &y_test) * 100.0;
        println!("{} classification accuracy : {}%", label, acc);
        add_decoder_section(
            &mut report,
            &format!("Grid-searched {} decoder", label),
            &decoder,
            &test,
            &y_test,
            acc,
        )?;
    }

    // Save the report to an HTML file
    report.save_to_file("report.html")?;
    println!("Report saved to report.html");

    Ok(())
}
