use anyhow::Result;
use approx::assert_abs_diff_eq;
use lane_keeping_sim::{
    config::LaneKeepingConfig,
    env::{Environment, LaneKeepingEnv},
    policy::{Policy, RandomPolicy, StanleyPolicy},
};

fn run_constant(
    env: &mut LaneKeepingEnv,
    action: f64,
    steps: usize,
) -> Result<Vec<(f64, f64, f64)>> {
    let mut trace = Vec::with_capacity(steps);
    for _ in 0..steps {
        let transition = env.step(action)?;
        assert!(!transition.terminal);
        let ego = *transition.observation.ego().expect("ego row");
        trace.push((transition.reward, ego.heading, ego.lateral));
    }
    Ok(trace)
}

#[test]
fn reference_configuration_file_matches_defaults() -> Result<()> {
    let config = LaneKeepingConfig::load_from_file("lane_keeping.toml")?;
    assert_eq!(config, LaneKeepingConfig::default());
    Ok(())
}

#[test]
fn single_straight_step_on_the_reference_lane() -> Result<()> {
    let mut config = LaneKeepingConfig::default();
    config.task.policy_frequency = 10;
    config.task.simulation_frequency = 10;

    let mut env = LaneKeepingEnv::new(config);
    env.reset()?;
    let transition = env.step(0.0)?;

    assert!(transition.reward <= 1.0);
    assert!(!transition.terminal);
    assert!(transition.info.is_empty());
    Ok(())
}

#[test]
fn reset_is_bit_identical() -> Result<()> {
    let mut env = LaneKeepingEnv::default();
    let first = env.reset()?;

    run_constant(&mut env, 0.7, 25)?;
    assert_ne!(env.observe().as_ref(), Some(&first));

    let second = env.reset()?;
    assert_eq!(first, second);
    assert_eq!(env.steps(), 0);
    assert_eq!(env.time(), 0.0);

    let ego_first = first.ego().expect("ego row");
    let ego_second = second.ego().expect("ego row");
    assert_eq!(ego_first.x.to_bits(), ego_second.x.to_bits());
    assert_eq!(ego_first.y.to_bits(), ego_second.y.to_bits());
    assert_eq!(ego_first.heading.to_bits(), ego_second.heading.to_bits());
    Ok(())
}

#[test]
fn full_left_steering_drifts_off_the_centerline() -> Result<()> {
    let mut env = LaneKeepingEnv::default();
    let initial = env.reset()?;
    let initial_heading = initial.ego().expect("ego row").heading;

    let trace = run_constant(&mut env, 1.0, 8)?;

    let mut previous_reward = 1.0;
    let mut previous_heading = initial_heading;
    for (i, &(reward, heading, _)) in trace.iter().enumerate() {
        assert!(
            reward < previous_reward,
            "reward did not drop at step {}: {} >= {}",
            i + 1,
            reward,
            previous_reward
        );
        assert!(heading > previous_heading, "heading did not grow at step {}", i + 1);
        previous_reward = reward;
        previous_heading = heading;
    }

    let (_, _, lateral) = trace[trace.len() - 1];
    assert!(lateral > 1.0, "lateral offset only reached {}", lateral);
    assert_eq!(env.vehicle().expect("ego").state.steering, env.config().task.steering_range);
    Ok(())
}

#[test]
fn straight_steering_keeps_heading_constant() -> Result<()> {
    let mut env = LaneKeepingEnv::default();
    let initial = env.reset()?;
    let heading = initial.ego().expect("ego row").heading;

    for (_, step_heading, _) in run_constant(&mut env, 0.0, 50)? {
        assert_eq!(step_heading, heading);
    }
    Ok(())
}

#[test]
fn stanley_policy_stays_in_lane() -> Result<()> {
    let mut env = LaneKeepingEnv::default();
    env.reset()?;
    let mut policy = StanleyPolicy::new(env.config().task.steering_range);

    let mut total = 0.0;
    let steps = 300;
    for _ in 0..steps {
        let action = policy.act(env.vehicle().expect("ego"), env.ego_lane().expect("lane"));
        let transition = env.step(action)?;
        assert!(transition.reward > 0.75, "left the lane at t={:.1}s", env.time());
        total += transition.reward;
    }

    assert!(total / steps as f64 > 0.9);
    assert_abs_diff_eq!(env.time(), 30.0, epsilon = 1e-9);
    Ok(())
}

#[test]
fn random_actions_never_abort_the_episode() -> Result<()> {
    let mut env = LaneKeepingEnv::default();
    env.reset()?;
    let mut policy = RandomPolicy::new(env.action_space(), Some(12345));

    for _ in 0..200 {
        let action = policy.act(env.vehicle().expect("ego"), env.ego_lane().expect("lane"));
        let transition = env.step(action)?;
        assert!(transition.reward.is_finite());
        assert!(transition.reward <= 1.0);
        assert!(!transition.terminal);
    }

    // Out-of-range actions are applied, not rejected
    let transition = env.step(3.0)?;
    assert!(transition.reward.is_finite());
    Ok(())
}
