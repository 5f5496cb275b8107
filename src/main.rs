use std::{fs, time::Duration};

use anyhow::Context;
use inspection_planner::{
    Planner, PlannerBuilder, cmd::ArgVals, executor::RouteExecutor, parse::parse_obstacle_list,
    point::GridPoint, view::grid_str,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = ArgVals::default();
    match args.get_symbol(0) {
        None => {
            println!(
                "Usage: inspection_planner obstacle_file [-extent=cells] [-step_cost=cost] [-radius=cells] [-offset=cells] [-start=A-0] [-threads=n] [-deadline_ms=ms] [-show] [-steps]"
            );
        }
        Some(filename) => match parse_args(&args) {
            Ok(planner) => {
                if let Err(e) = runner(filename, &planner, &args) {
                    eprintln!("Error: {e:#}");
                    std::process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error: {e:#}");
                std::process::exit(2);
            }
        },
    }
}

fn parse_args(args: &ArgVals) -> anyhow::Result<Planner> {
    let mut builder = PlannerBuilder::default();
    if let Some(extent) = args.get_value("-extent")? {
        builder.extent(extent);
    }
    if let Some(step_cost) = args.get_value("-step_cost")? {
        builder.step_cost(step_cost);
    }
    if let Some(radius) = args.get_value("-radius")? {
        builder.exclusion_radius(radius);
    }
    if let Some(offset) = args.get_value("-offset")? {
        builder.goal_offset(offset);
    }
    if let Some(threads) = args.get_value("-threads")? {
        builder.threads(threads);
    }
    if let Some(ms) = args.get_value("-deadline_ms")? {
        builder.deadline(Duration::from_millis(ms));
    }
    if let Some(start) = args.get_value::<String>("-start")? {
        let extent = args.get_value("-extent")?.unwrap_or(20);
        builder.start(GridPoint::from_label(&start, extent)?);
    }
    Ok(builder.build()?)
}

fn runner(filename: &str, planner: &Planner, args: &ArgVals) -> anyhow::Result<()> {
    let text = fs::read_to_string(filename).with_context(|| format!("Cannot read {filename}"))?;
    let obstacles = parse_obstacle_list(&text, planner.extent()).with_context(|| format!("In {filename}"))?;
    let route = planner.plan(&obstacles)?;
    println!("{}", route.as_python_dict());

    if args.has_flag("-show") {
        let goals = planner.goals_for(&obstacles)?;
        let graph = planner.graph_for(&obstacles);
        print!("{}", grid_str(&graph, &obstacles, &goals, planner.start(), Some(&route)));
    }

    if args.has_flag("-steps") {
        let mut executor = RouteExecutor::new(route);
        println!("{}", executor.full_path_copy());
        loop {
            if let Some(waypoint) = executor.waypoint() {
                println!("step {}/{}: {waypoint}", executor.step(), executor.max_steps());
            }
            if !executor.advance() {
                break;
            }
        }
    }
    Ok(())
}
