use crate::math::Point2d;
#[cfg(feature = "debug")]
use serde_json::json;

#[cfg(feature = "debug")]
thread_local!(
    static DEBUG_FRAME: std::cell::RefCell<Vec<serde_json::Value>> = Default::default();
);

#[allow(unused)]
pub fn debug_path(name: &str, points: &[Point2d]) {
    #[cfg(feature = "debug")]
    DEBUG_FRAME.with(|frame| {
        frame.borrow_mut().push(json!({
            "type": "path",
            "name": name,
            "points": points.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>(),
        }))
    })
}

#[allow(unused)]
pub fn debug_point(name: &str, point: Point2d) {
    #[cfg(feature = "debug")]
    DEBUG_FRAME.with(|frame| {
        frame.borrow_mut().push(json!({
            "type": "point",
            "name": name,
            "point": [point.x, point.y],
        }))
    })
}

#[cfg(feature = "debug")]
pub fn take_debug_frame() -> serde_json::Value {
    json!(DEBUG_FRAME.with(|frame| frame.take()))
}
