use std::env;
use std::process;

use attitude::config::Config;
use attitude::{Frame, Quaternion, Randf32};

const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;

fn main() {
    env_logger::init();

    let config = match Config::new(env::args().skip(1).collect()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };
    log::info!("integrating body rates:{config}");

    let orientation = run(&config);

    println!("final orientation: {orientation}");
    println!("x axis: {}", orientation.axis_x(Frame::Global));
    println!("y axis: {}", orientation.axis_y(Frame::Global));
    println!("z axis: {}", orientation.axis_z(Frame::Global));
}

/// Integrates the configured body rate into an orientation quaternion,
/// one incremental rotation per step, renormalizing as it goes.
fn run(config: &Config) -> Quaternion {
    let mut rand = Randf32::new();
    let mut orientation = Quaternion::identity();

    for step in 0..config.steps {
        let rate = (config.rate + rand.vec3_in(-config.noise..config.noise)) * DEG_TO_RAD;
        orientation *= Quaternion::from_rotation(Frame::Global, rate * config.dt);
        orientation = orientation.normalized();

        if (step + 1) % 100 == 0 {
            log::info!("step {}: {}", step + 1, orientation);
        }
        else {
            log::debug!("step {}: {}", step + 1, orientation);
        }
    }
    orientation
}
