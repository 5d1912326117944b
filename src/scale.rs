use crate::data::model::{Attribute, Record};

// ---------------------------------------------------------------------------
// Linear domain with d3-style "nice" rounding
// ---------------------------------------------------------------------------

/// Closed numeric interval shown along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    /// Extent of `attr` over `records`, or `None` when no record has a value.
    pub fn extent(records: &[Record], attr: Attribute) -> Option<Domain> {
        records
            .iter()
            .filter_map(|r| r.numeric(attr))
            .fold(None, |acc: Option<Domain>, v| {
                Some(match acc {
                    None => Domain { min: v, max: v },
                    Some(d) => Domain {
                        min: d.min.min(v),
                        max: d.max.max(v),
                    },
                })
            })
    }

    /// Widen both ends by `padding`.
    pub fn padded(self, padding: f64) -> Domain {
        Domain {
            min: self.min - padding,
            max: self.max + padding,
        }
    }

    /// A zero-width domain becomes `[v - 1, v + 1]`.
    pub fn non_degenerate(self) -> Domain {
        if self.max > self.min {
            self
        } else {
            self.padded(1.0)
        }
    }

    /// Extend the ends outward to round tick multiples for roughly `count` ticks.
    pub fn nice(self, count: usize) -> Domain {
        let (mut start, mut stop) = (self.min, self.max);
        let mut previous = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count as f64);
            if previous == Some(step) {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            previous = Some(step);
        }
        Domain {
            min: start,
            max: stop,
        }
    }
}

/// Tick spacing of 1, 2 or 5 times a power of ten. Negative results encode
/// the reciprocal of a sub-unit step, which keeps the rounding exact.
fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    let step = (stop - start) / count.max(1.0);
    if step <= 0.0 || !step.is_finite() {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::sample_record;

    #[test]
    fn extent_covers_all_records() {
        let records = vec![
            sample_record("a", "usa", 18.0),
            sample_record("b", "usa", 46.6),
            sample_record("c", "usa", 9.0),
        ];
        let d = Domain::extent(&records, Attribute::Mpg).unwrap();
        assert_eq!(d, Domain { min: 9.0, max: 46.6 });
        assert!(Domain::extent(&[], Attribute::Mpg).is_none());
    }

    #[test]
    fn nice_rounds_to_tick_multiples() {
        let d = Domain { min: 9.0, max: 46.6 }.nice(10);
        assert_eq!(d, Domain { min: 5.0, max: 50.0 });

        let d = Domain { min: 1613.0, max: 5140.0 }.nice(10);
        assert_eq!(d, Domain { min: 1500.0, max: 5500.0 });
    }

    #[test]
    fn nice_handles_fractional_steps() {
        let d = Domain { min: 0.12, max: 0.87 }.nice(10);
        assert!((d.min - 0.1).abs() < 1e-12);
        assert!((d.max - 0.9).abs() < 1e-12);
    }

    #[test]
    fn degenerate_domain_is_widened() {
        let d = Domain { min: 4.0, max: 4.0 };
        assert_eq!(d.nice(10), d);
        assert_eq!(d.non_degenerate(), Domain { min: 3.0, max: 5.0 });
        assert_eq!(
            Domain { min: 45.0, max: 230.0 }.padded(1.0),
            Domain { min: 44.0, max: 231.0 }
        );
    }
}
