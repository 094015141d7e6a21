use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::path::PathBuf;

use lane_keeping_sim::{
    config::LaneKeepingConfig,
    env::{Environment, LaneKeepingEnv},
    policy::{IdlePolicy, Policy, RandomPolicy, StanleyPolicy},
    simulation::EpisodeTracker,
};

#[derive(Parser)]
#[command(name = "lane-keeping-sim")]
#[command(about = "Run a lane keeping episode with a kinematic bicycle vehicle")]
struct Args {
    /// Task configuration file, defaults to the reference scenario
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Policy supplying the steering actions
    #[arg(short, long, value_enum, default_value_t = PolicyKind::Stanley)]
    policy: PolicyKind,

    /// Number of policy decisions to run
    #[arg(short = 'n', long, default_value_t = 200)]
    steps: u32,

    /// Random seed for the random policy
    #[arg(short, long)]
    seed: Option<u64>,

    /// Enable verbose logging for per-step progress
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum PolicyKind {
    /// Always steer straight
    Idle,
    /// Uniformly sampled actions
    Random,
    /// Stanley lateral controller
    Stanley,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .init();
    info!("Starting Lane Keeping Simulator");

    let config = match &args.config {
        Some(path) => LaneKeepingConfig::load_from_file(path)?,
        None => LaneKeepingConfig::default(),
    };
    info!(
        "Lane: amplitude {:.1}m, wavelength {:.1}m, width {:.1}m; steering range {:.3}rad",
        config.road.lane.amplitude,
        2.0 * std::f64::consts::PI / config.road.lane.pulsation,
        config.road.lane.width,
        config.task.steering_range
    );

    let mut env = LaneKeepingEnv::new(config.clone());
    let mut policy: Box<dyn Policy> = match args.policy {
        PolicyKind::Idle => Box::new(IdlePolicy),
        PolicyKind::Random => Box::new(RandomPolicy::new(env.action_space(), args.seed)),
        PolicyKind::Stanley => Box::new(StanleyPolicy::new(config.task.steering_range)),
    };

    env.reset().context("Failed to start episode")?;
    info!(
        "Running {} steps with the {} policy on {}",
        args.steps,
        policy.get_name(),
        env.get_name()
    );

    let mut tracker = EpisodeTracker::new();
    let report_every = config.task.policy_frequency.max(1);

    for step in 1..=args.steps {
        let (vehicle, lane) = match (env.vehicle(), env.ego_lane()) {
            (Some(vehicle), Some(lane)) => (vehicle, lane),
            _ => anyhow::bail!("Episode lost its ego vehicle"),
        };
        let action = policy.act(vehicle, lane);

        tracker.start_step();
        let transition = env.step(action)?;
        tracker.end_step(transition.reward);

        if step % report_every == 0 {
            if let Some(ego) = transition.observation.ego() {
                info!(
                    "t={:.1}s s={:.1}m lateral={:+.2}m reward={:.3}",
                    env.time(),
                    ego.longitudinal,
                    ego.lateral,
                    transition.reward
                );
            }
        }

        if transition.terminal {
            info!("Episode terminated after {} steps", step);
            break;
        }
    }

    info!("Episode completed!");
    info!("Simulated time: {:.1}s over {} steps", env.time(), tracker.steps());
    info!(
        "Reward: total {:.2}, mean {:.4}, worst {:.4}",
        tracker.total_reward(),
        tracker.mean_reward(),
        tracker.min_reward().unwrap_or(f64::NAN)
    );
    info!(
        "Average step time: {:.1}us ({:.0} steps/s)",
        tracker.average_step_time().as_secs_f64() * 1e6,
        tracker.steps_per_second()
    );

    Ok(())
}
