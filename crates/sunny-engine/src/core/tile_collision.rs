//! Box-versus-tile resolution.
//!
//! Movement is resolved one axis at a time, X first, then Y from the
//! X-resolved position. Each pass only looks at the tiles the box sweeps
//! across on that axis. Resolving both axes at once lets a box clip tile
//! corners, so the order here is load-bearing.

use crate::components::collider::Aabb;
use crate::components::tilemap::{TileLayer, TileType};
use glam::Vec2;

/// Slack used for edge comparisons so that a box resting exactly on a tile
/// boundary is classified consistently.
pub(crate) const SKIN: f32 = 1e-3;

/// Tolerances that decide how forgiving resolution is.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tolerances {
    pub slope_snap: f32,
    pub ladder_top: f32,
    /// Ledge height a box may walk onto. Zero when the box was airborne.
    pub step: f32,
}

/// Result of the X pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SweepX {
    /// Displacement actually allowed.
    pub dx: f32,
    pub blocked: bool,
}

/// Result of the Y pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SweepY {
    pub dy: f32,
    pub grounded: bool,
    pub ceiling: bool,
}

/// Non-blocking tiles found under the final box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct TriggerScan {
    pub hazard: bool,
    pub on_ladder: bool,
    pub ladder_top: bool,
}

/// Inclusive range between two indices, in either order.
fn span(a: i32, b: i32) -> std::ops::RangeInclusive<i32> {
    a.min(b)..=a.max(b)
}

/// Whether a box the size of `b`, standing with its bottom at `floor_y`,
/// stays clear of every solid tile.
fn fits_at(layers: &[&TileLayer], b: &Aabb, floor_y: f32) -> bool {
    let top = floor_y - b.size.y;
    layers.iter().all(|layer| {
        let cols = span(layer.column_at(b.left() + SKIN), layer.column_at(b.right() - SKIN));
        span(layer.row_at(top + SKIN), layer.row_at(floor_y - SKIN)).all(|row| {
            cols.clone()
                .all(|col| layer.tile_type_at(col, row) != TileType::Solid)
        })
    })
}

/// Surface Y of a slope tile at world X (Y-down: smaller is higher).
pub(crate) fn slope_surface_y(rect: &Aabb, tile_type: TileType, world_x: f32) -> Option<f32> {
    let (left, right) = tile_type.slope_heights()?;
    let t = ((world_x - rect.left()) / rect.size.x).clamp(0.0, 1.0);
    let height = left + (right - left) * t;
    Some(rect.bottom() - height * rect.size.y)
}

/// Horizontal pass. Only solid tiles block; one-way platforms and slopes
/// never stop horizontal motion.
pub(crate) fn sweep_x(layers: &[&TileLayer], b: Aabb, dx: f32, tol: &Tolerances) -> SweepX {
    let mut result = SweepX { dx, blocked: false };
    if dx == 0.0 {
        return result;
    }

    for layer in layers {
        let rows = span(layer.row_at(b.top() + SKIN), layer.row_at(b.bottom() - SKIN));
        let cols = if dx > 0.0 {
            span(layer.column_at(b.right() - SKIN), layer.column_at(b.right() + dx - SKIN))
        } else {
            span(layer.column_at(b.left() + SKIN), layer.column_at(b.left() + dx + SKIN))
        };

        for row in rows.clone() {
            for col in cols.clone() {
                if layer.tile_type_at(col, row) != TileType::Solid {
                    continue;
                }
                let rect = layer.tile_rect(col, row);
                // Ledges low enough to step onto, with room above them, are
                // left for the Y pass.
                if tol.step > 0.0
                    && rect.top() >= b.bottom() - tol.step
                    && fits_at(layers, &Aabb::new(b.pos + Vec2::new(dx, 0.0), b.size), rect.top())
                {
                    continue;
                }
                if dx > 0.0 {
                    // Tiles already overlapped are not ahead of the box.
                    if rect.left() < b.right() - SKIN {
                        continue;
                    }
                    let limit = (rect.left() - b.right()).max(0.0);
                    if limit < result.dx {
                        result.dx = limit;
                        result.blocked = true;
                    }
                } else {
                    if rect.right() > b.left() + SKIN {
                        continue;
                    }
                    let limit = (rect.right() - b.left()).min(0.0);
                    if limit > result.dx {
                        result.dx = limit;
                        result.blocked = true;
                    }
                }
            }
        }
    }
    result
}

/// Vertical pass, run on the box after the X pass has moved it.
pub(crate) fn sweep_y(layers: &[&TileLayer], b: Aabb, dy: f32, tol: &Tolerances) -> SweepY {
    if dy < 0.0 {
        return sweep_up(layers, b, dy);
    }

    let old_bottom = b.bottom();
    let new_bottom = old_bottom + dy;
    // A grounded box steps down onto ground, or follows a slope down, as far
    // as it could step up.
    let reach = tol.step.max(SKIN);
    let snap = tol.slope_snap.max(tol.step);
    let center_x = b.center().x;
    // Highest ground found (smallest Y).
    let mut ground: Option<f32> = None;
    let mut land = |y: f32| ground = Some(ground.map_or(y, |g: f32| g.min(y)));

    for layer in layers {
        let cols = span(layer.column_at(b.left() + SKIN), layer.column_at(b.right() - SKIN));
        let rows = span(layer.row_at(old_bottom - reach), layer.row_at(new_bottom + reach));

        for row in rows {
            for col in cols.clone() {
                let tile_type = layer.tile_type_at(col, row);
                let rect = layer.tile_rect(col, row);
                let reached = rect.top() <= new_bottom + reach;
                match tile_type {
                    TileType::Solid if reached && rect.top() >= old_bottom - reach => {
                        let lifted = rect.top() < old_bottom - SKIN;
                        if !lifted || fits_at(layers, &b, rect.top()) {
                            land(rect.top());
                        }
                    }
                    // One-way: the box must have started at or above the top.
                    TileType::Unisolid if reached && rect.top() >= old_bottom - SKIN => {
                        land(rect.top());
                    }
                    _ => {}
                }
            }
        }

        // Slopes are sampled under the box's horizontal centre only.
        let col = layer.column_at(center_x);
        let slope_rows = span(
            layer.row_at(old_bottom.min(new_bottom) - SKIN),
            layer.row_at(new_bottom + snap),
        );
        for row in slope_rows {
            let tile_type = layer.tile_type_at(col, row);
            let rect = layer.tile_rect(col, row);
            let Some(surface) = slope_surface_y(&rect, tile_type, center_x) else {
                continue;
            };
            let started_in_reach = old_bottom <= rect.bottom() + SKIN;
            if started_in_reach && new_bottom >= surface - snap {
                land(surface);
            }
        }
    }

    match ground {
        Some(y) => SweepY {
            dy: y - old_bottom,
            grounded: true,
            ceiling: false,
        },
        None => SweepY {
            dy,
            grounded: false,
            ceiling: false,
        },
    }
}

/// Rising: only solid tiles above the box stop it. One-way platforms and
/// slopes let the box pass through from below.
fn sweep_up(layers: &[&TileLayer], b: Aabb, dy: f32) -> SweepY {
    let old_top = b.top();
    let new_top = old_top + dy;
    let mut ceiling: Option<f32> = None;

    for layer in layers {
        let cols = span(layer.column_at(b.left() + SKIN), layer.column_at(b.right() - SKIN));
        let rows = span(layer.row_at(new_top - SKIN), layer.row_at(old_top + SKIN));
        for row in rows {
            for col in cols.clone() {
                if layer.tile_type_at(col, row) != TileType::Solid {
                    continue;
                }
                let rect = layer.tile_rect(col, row);
                if rect.bottom() <= old_top + SKIN && rect.bottom() >= new_top - SKIN {
                    ceiling = Some(ceiling.map_or(rect.bottom(), |c: f32| c.max(rect.bottom())));
                }
            }
        }
    }

    match ceiling {
        Some(y) => SweepY {
            dy: y - old_top,
            grounded: false,
            ceiling: true,
        },
        None => SweepY {
            dy,
            grounded: false,
            ceiling: false,
        },
    }
}

/// Find hazard and ladder tiles relative to the resolved box.
pub(crate) fn scan_triggers(layers: &[&TileLayer], b: Aabb, tol: &Tolerances) -> TriggerScan {
    let mut scan = TriggerScan::default();

    for layer in layers {
        let cols = span(layer.column_at(b.left() + SKIN), layer.column_at(b.right() - SKIN));
        let rows = span(layer.row_at(b.top() + SKIN), layer.row_at(b.bottom() - SKIN));
        for row in rows {
            for col in cols.clone() {
                match layer.tile_type_at(col, row) {
                    TileType::Hazard => scan.hazard = true,
                    TileType::Ladder => scan.on_ladder = true,
                    _ => {}
                }
            }
        }

        // Topmost ladder tile right under the centre, with the bottom edge
        // resting within tolerance above it.
        let col = layer.column_at(b.center().x);
        let row = layer.row_at(b.bottom() + tol.ladder_top);
        if layer.tile_type_at(col, row) == TileType::Ladder
            && layer.tile_type_at(col, row - 1) != TileType::Ladder
        {
            let top = layer.tile_rect(col, row).top();
            if b.bottom() >= top - tol.ladder_top && b.bottom() <= top + SKIN {
                scan.ladder_top = true;
            }
        }
    }
    scan
}
