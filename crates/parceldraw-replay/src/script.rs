//! Scripted editing sessions.

use kurbo::Point;
use parceldraw_core::{
    Canvas, CanvasViewport, ConfigError, EditorConfig, InteractionController, MouseButton,
    PointerEvent, Shape, ShapeId, ToolKind,
};
use parceldraw_render::{RenderContext, build_display_list};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or replaying a script.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to write replay output: {0}")]
    Output(#[source] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// One user action. Pointer coordinates are in screen space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: MouseButton,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        button: MouseButton,
    },
    Tool {
        tool: ToolKind,
    },
    PointCount {
        count: usize,
    },
    Rotate,
    Delete,
    Cancel,
    FocusLost,
}

/// A recorded session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: Option<EditorConfig>,
    #[serde(default)]
    pub viewport: CanvasViewport,
    pub steps: Vec<Step>,
}

/// Canvas contents after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutput {
    /// Shapes in stored order, oldest first.
    pub shapes: Vec<Shape>,
    pub selected: Option<ShapeId>,
    /// Number of draw commands the final frame needs.
    pub draw_commands: usize,
}

fn read(path: &Path) -> Result<String, ReplayError> {
    std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a script from a JSON file.
pub fn load_script(path: &Path) -> Result<Script, ReplayError> {
    let script = serde_json::from_str(&read(path)?)?;
    log::debug!("Loaded script from {}", path.display());
    Ok(script)
}

/// Load an editor configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<EditorConfig, ReplayError> {
    Ok(EditorConfig::from_json(&read(path)?)?)
}

/// Run every step of `script` against a fresh canvas.
pub fn replay(script: &Script) -> Result<ReplayOutput, ReplayError> {
    let config = script.config.clone().unwrap_or_default();
    config.validate()?;

    let mut canvas = Canvas::with_config(config);
    let mut controller = InteractionController::new();
    let viewport = &script.viewport;

    for (i, step) in script.steps.iter().enumerate() {
        log::trace!("Step {i}: {step:?}");
        match *step {
            Step::PointerDown { x, y, button } => controller.handle_event(
                &mut canvas,
                viewport,
                PointerEvent::Down {
                    position: Point::new(x, y),
                    button,
                },
            ),
            Step::PointerMove { x, y } => controller.handle_event(
                &mut canvas,
                viewport,
                PointerEvent::Move {
                    position: Point::new(x, y),
                },
            ),
            Step::PointerUp { x, y, button } => controller.handle_event(
                &mut canvas,
                viewport,
                PointerEvent::Up {
                    position: Point::new(x, y),
                    button,
                },
            ),
            Step::Tool { tool } => canvas.set_tool(tool),
            Step::PointCount { count } => {
                let stored = canvas.set_point_count(count);
                if stored != count {
                    log::warn!("Point count {count} clamped to {stored}");
                }
            }
            Step::Rotate => {
                controller.rotate_selected(&mut canvas);
            }
            Step::Delete => {
                controller.delete_selected(&mut canvas);
            }
            Step::Cancel => controller.cancel(&mut canvas),
            Step::FocusLost => controller.focus_lost(&mut canvas),
        }
    }

    let ctx = RenderContext::new(&canvas, viewport.size).with_preview(controller.preview());
    let draw_commands = build_display_list(&ctx).len();

    Ok(ReplayOutput {
        shapes: canvas.document.shapes_ordered().cloned().collect(),
        selected: canvas.selected(),
        draw_commands,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn test_parse_steps() {
        let script: Script = serde_json::from_str(
            r#"{
                "steps": [
                    { "op": "tool", "tool": "circle" },
                    { "op": "pointer_down", "x": 10, "y": 20 },
                    { "op": "pointer_up", "x": 10, "y": 20, "button": "right" },
                    { "op": "focus_lost" }
                ]
            }"#,
        )
        .expect("valid script");
        assert!(script.config.is_none());
        assert_eq!(script.steps.len(), 4);
        assert_eq!(script.steps[0], Step::Tool { tool: ToolKind::Circle });
        assert_eq!(
            script.steps[1],
            Step::PointerDown {
                x: 10.0,
                y: 20.0,
                button: MouseButton::Left
            }
        );
        assert_eq!(
            script.steps[2],
            Step::PointerUp {
                x: 10.0,
                y: 20.0,
                button: MouseButton::Right
            }
        );
    }

    #[test]
    fn test_replay_draw_and_rotate() {
        let script: Script = serde_json::from_str(
            r#"{
                "viewport": { "origin": { "x": 100, "y": 0 }, "size": { "width": 800, "height": 600 } },
                "steps": [
                    { "op": "pointer_down", "x": 150, "y": 50 },
                    { "op": "pointer_move", "x": 250, "y": 120 },
                    { "op": "pointer_up", "x": 250, "y": 120 },
                    { "op": "pointer_down", "x": 200, "y": 80 },
                    { "op": "pointer_up", "x": 200, "y": 80 },
                    { "op": "rotate" }
                ]
            }"#,
        )
        .expect("valid script");
        let output = replay(&script).expect("replay");
        assert_eq!(output.shapes.len(), 1);
        let shape = &output.shapes[0];
        assert_eq!(shape.origin(), Point::new(50.0, 50.0));
        assert!((shape.frame().width() - 100.0).abs() < f64::EPSILON);
        assert!((shape.frame().height() - 70.0).abs() < f64::EPSILON);
        assert!((shape.rotation() - 90.0).abs() < f64::EPSILON);
        assert_eq!(output.selected, Some(shape.id()));
        assert!(output.draw_commands > 3);
    }

    #[test]
    fn test_replay_polygon_and_delete() {
        let mut steps = vec![
            Step::Tool { tool: ToolKind::Polygon },
            Step::PointCount { count: 50 },
            Step::PointerDown {
                x: 0.0,
                y: 0.0,
                button: MouseButton::Left,
            },
        ];
        for i in 1..30 {
            steps.push(Step::PointerMove {
                x: i as f64 * 25.0,
                y: if i % 2 == 0 { 0.0 } else { 40.0 },
            });
        }
        steps.push(Step::PointerUp {
            x: 725.0,
            y: 40.0,
            button: MouseButton::Left,
        });
        let script = Script {
            steps: steps.clone(),
            ..Script::default()
        };
        let output = replay(&script).expect("replay");
        assert_eq!(output.shapes.len(), 1);
        let poly = output.shapes[0].as_polygon().expect("polygon");
        assert_eq!(poly.points().len(), 20);

        steps.push(Step::Delete);
        let output = replay(&Script {
            steps,
            ..Script::default()
        })
        .expect("replay");
        assert!(output.shapes.is_empty());
        assert_eq!(output.selected, None);
    }

    #[test]
    fn test_load_script_from_file() {
        let file = write_temp(r#"{ "steps": [ { "op": "cancel" } ] }"#);
        let script = load_script(file.path()).expect("loaded");
        assert_eq!(script.steps, vec![Step::Cancel]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_script(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ReplayError::Io { .. }));
    }

    #[test]
    fn test_bad_script() {
        let file = write_temp(r#"{ "steps": [ { "op": "teleport" } ] }"#);
        assert!(matches!(load_script(file.path()), Err(ReplayError::Parse(_))));
    }

    #[test]
    fn test_config_file() {
        let file = write_temp(r#"{ "min_draw_extent": 40 }"#);
        let config = load_config(file.path()).expect("config");
        assert!((config.min_draw_extent - 40.0).abs() < f64::EPSILON);

        let script = Script {
            config: Some(config),
            steps: vec![
                Step::PointerDown {
                    x: 0.0,
                    y: 0.0,
                    button: MouseButton::Left,
                },
                Step::PointerUp {
                    x: 30.0,
                    y: 30.0,
                    button: MouseButton::Left,
                },
            ],
            ..Script::default()
        };
        assert!(replay(&script).expect("replay").shapes.is_empty());

        let bad = write_temp(r#"{ "min_resize_size": 0 }"#);
        assert!(matches!(load_config(bad.path()), Err(ReplayError::Config(_))));
    }

    #[test]
    fn test_output_error_message() {
        let source = serde_json::from_str::<Script>("{").unwrap_err();
        let err = ReplayError::Output(source);
        assert!(err.to_string().starts_with("failed to write replay output"));
    }
}
