use std::fmt;

pub type AttitudeResult<T> = Result<T, AttitudeError>;

#[derive(Debug)]
pub enum AttitudeError {
    SliceTooShort(usize, usize),
    InvalidStepCount(String),
    InvalidTimeStep(String),
    InvalidRate(String),
    InvalidNoise(String),
}
impl fmt::Display for AttitudeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttitudeError::SliceTooShort(want, got) => {
                write!(f, "
                    \rExpected at least {want} components, found {got}",
                )
            }
            AttitudeError::InvalidStepCount(arg) => {
                write!(f, "
                    \rInvalid step count: {arg}",
                )
            }
            AttitudeError::InvalidTimeStep(arg) => {
                write!(f, "
                    \rInvalid time step: {arg}",
                )
            }
            AttitudeError::InvalidRate(arg) => {
                write!(f, "
                    \rInvalid body rate: {arg}",
                )
            }
            AttitudeError::InvalidNoise(arg) => {
                write!(f, "
                    \rInvalid rate noise: {arg}",
                )
            }
        }
    }
}
