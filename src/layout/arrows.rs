use crate::surface::{NodeId, Surface};
use crate::widgets::{Arrow, Bar};

/// One arrow per resolvable dependency, drawn into `group`.
///
/// `bars` is indexed by task index. Ids that match no bar are skipped.
pub fn build_arrows(
    surface: &mut dyn Surface,
    group: NodeId,
    bars: &[Bar],
    curve: f64,
    padding: f64,
) -> Vec<Arrow> {
    let mut arrows = Vec::new();
    for to in bars {
        for id in to.task.dependencies() {
            match bars.iter().find(|bar| bar.task.id == id) {
                Some(from) => arrows.push(Arrow::new(surface, group, from, to, curve, padding)),
                None => log::warn!(
                    "Task '{}' depends on unknown task '{}'; no arrow drawn",
                    to.task.id,
                    id
                ),
            }
        }
    }
    arrows
}

/// Record on each bar the arrows that start or end at it.
pub fn attach_arrows(bars: &mut [Bar], arrows: &[Arrow]) {
    for bar in bars.iter_mut() {
        bar.arrows.clear();
    }
    for (i, arrow) in arrows.iter().enumerate() {
        if let Some(bar) = bars.get_mut(arrow.from_index) {
            bar.arrows.push(i);
        }
        if arrow.to_index != arrow.from_index {
            if let Some(bar) = bars.get_mut(arrow.to_index) {
                bar.arrows.push(i);
            }
        }
    }
}
