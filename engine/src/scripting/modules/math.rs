//! Math API for rhai scripts
//!
//! Registers the `Vec2` type with constructors, accessors and the usual
//! operators. Script floats are f64, engine math is f32; conversion
//! happens at this boundary.

use glam::Vec2;
use rhai::{Dynamic, Engine, EvalAltResult};
use tracing::debug;

/// Register Vec2 and its operations with the rhai engine
pub fn register_math_api(engine: &mut Engine) {
    debug!("Registering math API");

    engine
        .register_type_with_name::<Vec2>("Vec2")
        .register_fn("vec2", |x: f64, y: f64| Vec2::new(x as f32, y as f32))
        .register_get("x", |v: &mut Vec2| v.x as f64)
        .register_get("y", |v: &mut Vec2| v.y as f64)
        .register_set("x", |v: &mut Vec2, x: f64| v.x = x as f32)
        .register_set("y", |v: &mut Vec2, y: f64| v.y = y as f32);

    engine
        .register_fn("+", |a: Vec2, b: Vec2| a + b)
        .register_fn("-", |a: Vec2, b: Vec2| a - b)
        .register_fn("*", |a: Vec2, b: f64| a * b as f32)
        .register_fn("*", |a: f64, b: Vec2| b * a as f32)
        .register_fn("/", |a: Vec2, b: f64| a / b as f32)
        .register_fn("dot", |a: Vec2, b: Vec2| a.dot(b) as f64)
        .register_fn("length", |v: Vec2| v.length() as f64)
        .register_fn("normalize", |v: Vec2| v.normalize_or_zero())
        .register_fn("lerp", |a: Vec2, b: Vec2, t: f64| a.lerp(b, t as f32))
        .register_fn("to_string", |v: Vec2| format!("({}, {})", v.x, v.y));
}

/// Parse a Vec2 from various Dynamic representations
pub(crate) fn parse_vec2_from_dynamic(value: Dynamic) -> Result<Vec2, Box<EvalAltResult>> {
    // Try to cast directly to Vec2 first
    if let Some(vec2) = value.clone().try_cast::<Vec2>() {
        return Ok(vec2);
    }

    // Fall back to an array of 2 floats
    if let Ok(array) = value.into_array() {
        if array.len() == 2 {
            let x = array[0]
                .clone()
                .as_float()
                .map_err(|_| "Expected float for x component")?;
            let y = array[1]
                .clone()
                .as_float()
                .map_err(|_| "Expected float for y component")?;
            return Ok(Vec2::new(x as f32, y as f32));
        }
    }

    Err("Expected Vec2 or array of 2 floats".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vec2_from_array() {
        let array = vec![Dynamic::from(1.0f64), Dynamic::from(2.0f64)];
        let dynamic = Dynamic::from(array);

        let result = parse_vec2_from_dynamic(dynamic).unwrap();
        assert_eq!(result, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_parse_vec2_passthrough() {
        let dynamic = Dynamic::from(Vec2::new(3.0, -4.0));
        let result = parse_vec2_from_dynamic(dynamic).unwrap();
        assert_eq!(result, Vec2::new(3.0, -4.0));
    }

    #[test]
    fn test_parse_vec2_rejects_garbage() {
        assert!(parse_vec2_from_dynamic(Dynamic::from("nope")).is_err());
        assert!(parse_vec2_from_dynamic(Dynamic::from(vec![Dynamic::from(1.0f64)])).is_err());
    }

    #[test]
    fn test_vec2_in_scripts() {
        let mut engine = Engine::new();
        register_math_api(&mut engine);

        let result: Vec2 = engine
            .eval("let a = vec2(1.0, 2.0); let b = vec2(3.0, 4.0); a + b * 2.0")
            .unwrap();
        assert_eq!(result, Vec2::new(7.0, 10.0));

        let len: f64 = engine.eval("length(vec2(3.0, 4.0))").unwrap();
        assert!((len - 5.0).abs() < 1e-6);
    }
}
