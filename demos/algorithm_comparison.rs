use kbandits::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("kbandits: k-armed bandit algorithm comparison\n");
    println!("{}", "=".repeat(60));

    let probabilities = [0.3, 0.5, 0.8, 0.4];
    let k = probabilities.len();

    let mut builder = Simulator::builder().steps(1000).runs(500).seed(42);
    for p in probabilities {
        builder = builder.arm(BernoulliArm::new(p)?);
    }
    let simulator = builder
        .policy(EpsilonGreedy::new(k, 0.0)?)
        .policy(EpsilonGreedy::new(k, 0.1)?)
        .policy(Softmax::new(k, 0.1)?)
        .policy(Ucb1::new(k, 1.0)?)
        .policy(Ucb2::new(k, 0.5)?)
        .policy(GradientBandit::new(k, 0.1)?)
        .build()?;

    println!("Arms:");
    for (i, arm) in simulator.arms().iter().enumerate() {
        let marker = if i == simulator.optimal_arm() { "  <- best" } else { "" };
        println!("  {i}: {arm}{marker}");
    }
    println!("{}", "=".repeat(60));

    let report = simulator.run();

    for summary in &report.summaries {
        println!("\n{}", summary.label);
        println!("{}", "-".repeat(summary.label.len()));
        println!("  Average reward:        {:.3}", summary.overall_mean_reward());
        println!("  Final regret:          {:.1}", summary.final_cumulative_regret());
        println!(
            "  Optimal arm at T:      {:.1}%",
            summary.final_optimal_fraction() * 100.0
        );
        println!("  Arm selections (mean reward):");
        let stats = &summary.arm_statistics;
        for (arm, (count, mean)) in stats
            .selection_counts
            .iter()
            .zip(&stats.mean_rewards)
            .enumerate()
        {
            println!("    {arm}: {count} ({mean:.3})");
        }
    }

    Ok(())
}
