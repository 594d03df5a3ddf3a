use std::fmt;

use crate::error::{AttitudeError, AttitudeResult};
use crate::vector::Vec3;


/// Parsing states.
enum Parse {
    None,
    Steps,
    TimeStep,
    Rate,
    Noise,
}


/// User defined settings for the integration demo.
#[derive(Clone, Debug)]
pub struct Config {
    pub steps: usize,
    pub dt: f32,
    pub rate: Vec3,
    pub noise: f32,
}
impl Config {
    /// Create a new Config with the specified command line arguments.
    pub fn new(args: Vec<String>) -> AttitudeResult<Config> {
        let mut parser = Parse::None;
        let mut cfg = Config::default();

        for arg in args.into_iter() {
            match arg.as_str() {
                "-steps" => {
                    parser = Parse::Steps;
                    continue;
                }
                "-dt" => {
                    parser = Parse::TimeStep;
                    continue;
                }
                "-rate" => {
                    parser = Parse::Rate;
                    continue;
                }
                "-noise" => {
                    parser = Parse::Noise;
                    continue;
                }
                _ => {},
            }
            match parser {
                Parse::Steps => {
                    if let Ok(steps) = arg.parse::<usize>() {
                        cfg.steps = steps;
                    }
                    else {
                        return Err(
                            AttitudeError::InvalidStepCount(arg.clone())
                        );
                    }
                }
                Parse::TimeStep => {
                    if let Ok(dt) = arg.parse::<f32>() {
                        cfg.dt = dt;
                    }
                    else {
                        return Err(
                            AttitudeError::InvalidTimeStep(arg.clone())
                        );
                    }
                }
                Parse::Rate => {
                    if let Some(rate) = parse_vec3(&arg) {
                        cfg.rate = rate;
                    }
                    else {
                        return Err(
                            AttitudeError::InvalidRate(arg.clone())
                        );
                    }
                }
                Parse::Noise => {
                    if let Ok(noise) = arg.parse::<f32>() {
                        cfg.noise = noise;
                    }
                    else {
                        return Err(
                            AttitudeError::InvalidNoise(arg.clone())
                        );
                    }
                }
                Parse::None => {},
            }
        }
        Ok(cfg)
    }
}
impl Default for Config {
    fn default() -> Self {
        Self {
            steps: 1000,
            dt: 0.01,
            rate: Vec3::new(0.0, 0.0, 90.0),
            noise: 0.0,
        }
    }
}
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "
            \rSteps: {}
            \rTime step: {} s
            \rBody rate: {} deg/s
            \rRate noise: {} deg/s",
            self.steps,
            self.dt,
            self.rate,
            self.noise,
        )
    }
}

/// Parses a comma separated component list, e.g. "0,45,90".
fn parse_vec3(arg: &str) -> Option<Vec3> {
    let vals = arg.split(',')
        .map(|s| s.trim().parse::<f32>())
        .collect::<Result<Vec<f32>, _>>()
        .ok()?;
    Vec3::try_from(vals.as_slice()).ok()
}


#[cfg(test)]
fn args(s: &[&str]) -> Vec<String> {
    s.iter().map(|s| s.to_string()).collect()
}

#[test]
fn defaults() {
    let cfg = Config::new(Vec::new()).unwrap();
    assert!(cfg.steps == 1000);
    assert!(cfg.dt == 0.01);
    assert!(cfg.rate == Vec3::new(0.0, 0.0, 90.0));
    assert!(cfg.noise == 0.0);
}

#[test]
fn parse_all_options() {
    let cfg = Config::new(args(&[
        "-steps", "500",
        "-dt", "0.002",
        "-rate", "1,-2.5,3",
        "-noise", "0.5",
    ])).unwrap();

    assert!(cfg.steps == 500);
    assert!(cfg.dt == 0.002);
    assert!(cfg.rate == Vec3::new(1.0, -2.5, 3.0));
    assert!(cfg.noise == 0.5);
}

#[test]
fn invalid_step_count() {
    let res = Config::new(args(&["-steps", "many"]));
    assert!(matches!(res, Err(AttitudeError::InvalidStepCount(_))));
}

#[test]
fn invalid_time_step() {
    let res = Config::new(args(&["-dt", "fast"]));
    assert!(matches!(res, Err(AttitudeError::InvalidTimeStep(_))));
}

#[test]
fn invalid_rate() {
    let res = Config::new(args(&["-rate", "1,2"]));
    assert!(matches!(res, Err(AttitudeError::InvalidRate(_))));

    let res = Config::new(args(&["-rate", "1,2,spin"]));
    assert!(matches!(res, Err(AttitudeError::InvalidRate(_))));
}

#[test]
fn invalid_noise() {
    let res = Config::new(args(&["-noise", "loud"]));
    assert!(matches!(res, Err(AttitudeError::InvalidNoise(_))));
}
