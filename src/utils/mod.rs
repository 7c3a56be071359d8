pub mod random;

pub use random::{
    degrees_to_radians, radians_to_degrees, rand_real_in_range, rand_unsigned_in_range,
    random_angle, really_close, sample_distinct, EPSILON,
};
