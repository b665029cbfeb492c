use snafu::Snafu;

#[derive(Snafu, Debug, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum SchedulerError {
    #[snafu(display("unrecognized quality rating {rating}"))]
    InvalidRating { rating: u8 },
}

pub type Result<T, E = SchedulerError> = std::result::Result<T, E>;
