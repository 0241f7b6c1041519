use crate::math::C;

/// Squared escape radius. |z| > 2 is tested as re^2 + im^2 > 4 to avoid the sqrt.
pub const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// Escape time of `c` under z -> z^2 + c starting from z = 0.
///
/// Returns the first `n` with |z_n| > 2, or `max_iter` when the orbit stays
/// bounded for all `max_iter` steps. Real and imaginary parts are carried as
/// two floats so the arithmetic matches the bulk strategies lane for lane.
#[inline]
pub fn mandelbrot_escapes(c: C, max_iter: u32) -> u32 {
    let mut re = 0.0;
    let mut im = 0.0;
    for n in 0..max_iter {
        let re2 = re * re;
        let im2 = im * im;
        if re2 + im2 > ESCAPE_RADIUS_SQ { return n; }
        im = 2.0 * re * im + c.im;
        re = re2 - im2 + c.re;
    }
    max_iter
}

/// Same recurrence written against the complex type. Slower, kept as the oracle.
pub fn mandelbrot_escapes_complex(c: C, max_iter: u32) -> u32 {
    let mut z = C::ZERO;
    for n in 0..max_iter {
        if z.abs_sq() > ESCAPE_RADIUS_SQ { return n; }
        z = z.mul(z).add(c);
    }
    max_iter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        for max_iter in [1, 2, 80, 1000] {
            assert_eq!(mandelbrot_escapes(C::ZERO, max_iter), max_iter);
            assert_eq!(mandelbrot_escapes_complex(C::ZERO, max_iter), max_iter);
        }
    }

    #[test]
    fn two_sits_on_the_radius_then_escapes() {
        // z1 = 2 has |z1| == 2, which is not an escape under the strict test
        assert_eq!(mandelbrot_escapes(C::new(2.0, 0.0), 80), 2);
        assert_eq!(mandelbrot_escapes_complex(C::new(2.0, 0.0), 80), 2);
    }

    #[test]
    fn far_point_escapes_after_first_step() {
        assert_eq!(mandelbrot_escapes(C::new(2.0, 2.0), 80), 1);
    }

    #[test]
    fn minus_one_is_a_period_two_cycle() {
        assert_eq!(mandelbrot_escapes(C::new(-1.0, 0.0), 500), 500);
    }

    #[test]
    fn bound_caps_slow_escapes() {
        // c = 0.26 escapes slowly, well past 5 steps
        assert_eq!(mandelbrot_escapes(C::new(0.26, 0.0), 5), 5);
        assert!(mandelbrot_escapes(C::new(0.26, 0.0), 10_000) < 10_000);
    }

    #[test]
    fn split_and_complex_forms_agree() {
        let mut re = -2.0;
        while re <= 0.5 {
            let mut im = -1.2;
            while im <= 1.2 {
                let c = C::new(re, im);
                assert_eq!(mandelbrot_escapes(c, 64), mandelbrot_escapes_complex(c, 64), "c = {:?}", c);
                im += 0.037;
            }
            re += 0.041;
        }
    }
}
