/// Squared escape radius.  Once `|z|² > 4` the orbit is guaranteed to diverge.
pub const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// Escape-time iteration count for `c = x0 + i·y0` under `z_{n+1} = z_n² + c`.
///
/// The orbit starts at `z₀ = 0`.  The escape test runs before every step, so
/// the return value is the index of the first `z` with `|z|² > 4`, or
/// `max_iter` if the orbit stayed bounded that long.  Because `z₀ = 0` always
/// passes the first test, a point outside radius 2 returns `1`.
///
/// The squares are carried between steps so each iteration costs three
/// multiplications.
#[inline]
pub fn escape_iterations(x0: f64, y0: f64, max_iter: u32) -> u32 {
    let mut x = 0.0_f64;
    let mut y = 0.0_f64;
    let mut x2 = 0.0_f64;
    let mut y2 = 0.0_f64;
    let mut i = 0;
    while x2 + y2 <= ESCAPE_RADIUS_SQ && i < max_iter {
        y = 2.0 * x * y + y0;
        x = x2 - y2 + x0;
        x2 = x * x;
        y2 = y * y;
        i += 1;
    }
    i
}
