use crate::domain::model::Range;
use crate::domain::ports::RandomSource;

/// Bounded-uniform integer draws: `floor(u * (max - min + 1)) + min` with `u` in `[0, 1)`.
pub struct DrawEngine<R: RandomSource> {
    source: R,
}

impl<R: RandomSource> DrawEngine<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn draw(&mut self, range: &Range) -> i64 {
        let u = self.source.next_f64();
        assert!(
            (0.0..1.0).contains(&u),
            "random source produced {} outside [0, 1)",
            u
        );

        let offset = (u * range.span() as f64).floor() as i128;
        // f64 rounding on very wide spans can land one past the end
        let value = (i128::from(range.min()) + offset).min(i128::from(range.max()));
        value as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::range::validate;

    struct Fixed(Vec<f64>);

    impl RandomSource for Fixed {
        fn next_f64(&mut self) -> f64 {
            self.0.remove(0)
        }
    }

    #[test]
    fn test_draw_maps_unit_interval_onto_range() {
        let range = validate(1, 10).unwrap();
        let mut engine = DrawEngine::new(Fixed(vec![0.0, 0.5, 0.999_999]));

        assert_eq!(engine.draw(&range), 1);
        assert_eq!(engine.draw(&range), 6);
        assert_eq!(engine.draw(&range), 10);
    }

    #[test]
    fn test_draw_negative_range() {
        let range = validate(-3, -1).unwrap();
        let mut engine = DrawEngine::new(Fixed(vec![0.0, 0.4, 0.9]));

        assert_eq!(engine.draw(&range), -3);
        assert_eq!(engine.draw(&range), -2);
        assert_eq!(engine.draw(&range), -1);
    }

    #[test]
    fn test_draw_full_i64_range_stays_in_bounds() {
        let range = validate(i64::MIN, i64::MAX).unwrap();
        let mut engine = DrawEngine::new(Fixed(vec![0.0, 0.999_999_999_999_999_9]));

        assert_eq!(engine.draw(&range), i64::MIN);
        assert!(range.contains(engine.draw(&range)));
    }

    #[test]
    #[should_panic(expected = "outside [0, 1)")]
    fn test_draw_fails_fast_on_bad_source() {
        let range = validate(1, 2).unwrap();
        let mut engine = DrawEngine::new(Fixed(vec![1.0]));
        engine.draw(&range);
    }
}
