//! Reading-order reconstruction for text detections.
//!
//! Detection engines return regions in detection order, which rarely matches
//! how a person reads the label. This module rebuilds reading order by
//! clustering detections into horizontal lines and emitting each line left
//! to right, top to bottom.

use crate::core::OrderingConfig;
use crate::domain::Detection;
use std::cmp::Ordering;
use tracing::debug;

/// A detection reduced to the geometry the line clustering needs.
#[derive(Debug, Clone, Copy)]
struct BoxSummary<'a> {
    text: &'a str,
    x_center: f32,
    y_center: f32,
    height: f32,
}

impl<'a> BoxSummary<'a> {
    fn from_detection(detection: &'a Detection) -> Self {
        let xs = detection.quad.iter().map(|p| p.x);
        let ys = detection.quad.iter().map(|p| p.y);
        let (x_min, x_max) = min_max(xs);
        let (y_min, y_max) = min_max(ys);
        Self {
            text: &detection.text,
            x_center: (x_min + x_max) / 2.0,
            y_center: (y_min + y_max) / 2.0,
            height: y_max - y_min,
        }
    }
}

fn min_max(values: impl Iterator<Item = f32>) -> (f32, f32) {
    values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Reassembles detections into reading order.
///
/// Detections are clustered into lines, each line is sorted left to right,
/// tokens within a line are joined with single spaces, and lines are joined
/// with newlines. Returns an empty string for an empty slice.
pub fn sort_spatially(detections: &[Detection], config: &OrderingConfig) -> String {
    if detections.is_empty() {
        return String::new();
    }

    let summaries: Vec<BoxSummary<'_>> =
        detections.iter().map(BoxSummary::from_detection).collect();

    let lines = group_into_lines(summaries, config);
    debug!(detections = detections.len(), lines = lines.len(), "reading order built");

    lines
        .iter()
        .map(|line| {
            line.iter()
                .map(|b| b.text)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Clusters box summaries into reading lines.
///
/// Boxes are walked in vertical order. A box joins the current line when its
/// center is within the height threshold of any member, or when the gap to
/// the line is small relative to the line's vertical span; otherwise it
/// starts a new line. Each finished line is sorted by horizontal center.
fn group_into_lines<'a>(
    mut boxes: Vec<BoxSummary<'a>>,
    config: &OrderingConfig,
) -> Vec<Vec<BoxSummary<'a>>> {
    boxes.sort_by(|a, b| a.y_center.partial_cmp(&b.y_center).unwrap_or(Ordering::Equal));

    let mut heights: Vec<f32> = boxes.iter().map(|b| b.height).collect();
    let median_height = median(&mut heights);
    let y_threshold = median_height * config.line_height_ratio;

    let mut lines: Vec<Vec<BoxSummary<'a>>> = Vec::new();
    let mut current: Vec<BoxSummary<'a>> = vec![boxes[0]];

    for b in boxes.into_iter().skip(1) {
        let in_same_line = current
            .iter()
            .any(|member| (b.y_center - member.y_center).abs() < y_threshold);

        if in_same_line {
            current.push(b);
            continue;
        }

        let (min_y, max_y) = min_max(current.iter().map(|m| m.y_center));
        let line_span = max_y - min_y + median_height;
        let gap = b.y_center - max_y;

        // Jitter rescue: a box just below a line it failed the strict
        // threshold for still belongs to that line.
        if gap < line_span * config.gap_ratio {
            current.push(b);
        } else {
            finish_line(&mut current);
            lines.push(std::mem::replace(&mut current, vec![b]));
        }
    }

    finish_line(&mut current);
    lines.push(current);
    lines
}

fn finish_line(line: &mut [BoxSummary<'_>]) {
    line.sort_by(|a, b| a.x_center.partial_cmp(&b.x_center).unwrap_or(Ordering::Equal));
}

/// Median of a non-empty slice, averaging the middle pair for even lengths.
fn median(values: &mut [f32]) -> f32 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x: f32, y: f32, text: &str) -> Detection {
        Detection::from_rect(x, y, 12.0, 10.0, text)
    }

    #[test]
    fn empty_input_gives_empty_string() {
        assert_eq!(sort_spatially(&[], &OrderingConfig::default()), "");
    }

    #[test]
    fn single_detection_has_no_newline() {
        let detections = [boxed(5.0, 5.0, "LOT")];
        assert_eq!(sort_spatially(&detections, &OrderingConfig::default()), "LOT");
    }

    #[test]
    fn grid_of_tokens_reads_left_to_right_top_to_bottom() {
        let detections = [
            boxed(30.0, 10.0, "b"),
            boxed(10.0, 10.0, "a"),
            boxed(50.0, 10.0, "c"),
            boxed(20.0, 50.0, "d"),
            boxed(60.0, 50.0, "e"),
            boxed(10.0, 90.0, "f"),
        ];
        let text = sort_spatially(&detections, &OrderingConfig::default());
        assert_eq!(text, "a b c\nd e\nf");
    }

    #[test]
    fn vertical_jitter_stays_on_one_line() {
        // Centers 3 apart, under the 7.0 threshold from a median height of 10.
        let detections = [
            boxed(40.0, 13.0, "world"),
            boxed(10.0, 10.0, "hello"),
        ];
        let text = sort_spatially(&detections, &OrderingConfig::default());
        assert_eq!(text, "hello world");
    }

    #[test]
    fn gap_rescue_extends_a_tall_line() {
        // The third box misses the strict threshold against every member but
        // the gap to the line is under half its span.
        let detections = [
            boxed(10.0, 10.0, "a"),
            boxed(30.0, 16.0, "b"),
            boxed(50.0, 23.0, "c"),
        ];
        let text = sort_spatially(&detections, &OrderingConfig::default());
        assert_eq!(text, "a b c");
    }

    #[test]
    fn distinct_rows_split_into_lines() {
        let detections = [
            boxed(10.0, 80.0, "EXP"),
            boxed(10.0, 10.0, "LOT"),
            boxed(40.0, 80.0, "2027-01"),
            boxed(40.0, 10.0, "A1234"),
        ];
        let text = sort_spatially(&detections, &OrderingConfig::default());
        assert_eq!(text, "LOT A1234\nEXP 2027-01");
    }

    #[test]
    fn reordering_ordered_output_is_identity() {
        let detections = [
            boxed(30.0, 10.0, "sugar,"),
            boxed(10.0, 10.0, "water,"),
            boxed(50.0, 10.0, "salt"),
        ];
        let config = OrderingConfig::default();
        let first = sort_spatially(&detections, &config);
        assert_eq!(first, "water, sugar, salt");

        let as_one = [Detection::from_rect(10.0, 10.0, 52.0, 10.0, first.clone())];
        assert_eq!(sort_spatially(&as_one, &config), first);
    }

    #[test]
    fn ordering_ignores_input_order() {
        let mut detections = vec![
            boxed(10.0, 10.0, "a"),
            boxed(30.0, 10.0, "b"),
            boxed(10.0, 50.0, "c"),
        ];
        let forward = sort_spatially(&detections, &OrderingConfig::default());
        detections.reverse();
        let reversed = sort_spatially(&detections, &OrderingConfig::default());
        assert_eq!(forward, reversed);
        assert_eq!(forward, "a b\nc");
    }
}
