/// Solve `a*t^2 + b*t + c = 0` for the ray parameter of a quadric hit.
///
/// Every implicit primitive reduces its intersection test to this quadratic
/// by substituting the ray `origin + t * direction` into its equation.
///
/// Returns the nearest non-negative root, or the far root when the near one
/// lies behind the ray origin (the origin is inside the surface). Returns
/// `None` when the discriminant is negative, when both roots are behind the
/// origin, or when `a` is zero and the equation is not quadratic.
pub fn resolve_quadratic(a: f64, b: f64, c: f64) -> Option<f64> {
    if a == 0.0 {
        return None;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let r0 = (-b - sqrtd) / (2.0 * a);
    let r1 = (-b + sqrtd) / (2.0 * a);

    // A negative leading coefficient (hyperboloids) swaps the roots
    let (tmin, tmax) = if r0 <= r1 { (r0, r1) } else { (r1, r0) };

    if tmax < 0.0 {
        return None;
    }

    Some(if tmin >= 0.0 { tmin } else { tmax })
}
