use anyhow::{Context, Result};
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut},
    rect::Rect,
};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    detection::Hand,
    models::MonitorSnapshot,
    monitor::FrameReport,
    timer::ZoneStatus,
    zones::{Zone, ZoneSet},
};

const ZONE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const HAND_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const WORKING_COLOR: Rgb<u8> = Rgb([40, 200, 80]);
const PAUSED_COLOR: Rgb<u8> = Rgb([240, 170, 30]);
const STRIP_BACKGROUND: Rgb<u8> = Rgb([60, 60, 60]);

const STATUS_STRIP_HEIGHT: u32 = 12;
const STATUS_BADGE_WIDTH: u32 = 24;
const KEYPOINT_RADIUS: i32 = 3;

/// Writes annotated frames as numbered PNGs.
pub struct FrameRenderer {
    output_dir: PathBuf,
    frames_written: u64,
}

impl FrameRenderer {
    pub fn new(output_dir: &Path) -> Result<Self> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            frames_written: 0,
        })
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn render(&mut self, mut image: RgbImage, report: &FrameReport, zones: &ZoneSet) -> Result<()> {
        annotate(&mut image, &report.hands, &report.snapshot, zones);

        let path = self.output_dir.join(format!("frame_{:06}.png", report.index));
        image
            .save_with_format(&path, ImageFormat::Png)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        self.frames_written += 1;
        Ok(())
    }
}

/// Draws zones, hands and the status strip in place.
pub fn annotate(image: &mut RgbImage, hands: &[Hand], snapshot: &MonitorSnapshot, zones: &ZoneSet) {
    for zone in zones.zones() {
        draw_zone(image, zone);
    }
    for hand in hands {
        draw_hand(image, hand);
    }
    draw_status_strip(image, snapshot);
}

fn draw_zone(image: &mut RgbImage, zone: &Zone) {
    for (a, b) in zone.edges() {
        draw_line_segment_mut(
            image,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            ZONE_COLOR,
        );
    }
}

fn draw_hand(image: &mut RgbImage, hand: &Hand) {
    let (width, height) = image.dimensions();
    let (width, height) = (width as i32, height as i32);

    // Edges past the frame are pulled to one pixel outside it, so they stay
    // invisible and the rect arithmetic stays small.
    let bbox = hand.bbox;
    let left = bbox.x_min.clamp(-1, width);
    let right = bbox.x_max.clamp(-1, width);
    let top = bbox.y_min.clamp(-1, height);
    let bottom = bbox.y_max.clamp(-1, height);
    draw_hollow_rect_mut(
        image,
        Rect::at(left, top).of_size((right - left + 1) as u32, (bottom - top + 1) as u32),
        HAND_COLOR,
    );

    let visible_x = -KEYPOINT_RADIUS..=width + KEYPOINT_RADIUS;
    let visible_y = -KEYPOINT_RADIUS..=height + KEYPOINT_RADIUS;
    for point in &hand.landmarks {
        if visible_x.contains(&point.x) && visible_y.contains(&point.y) {
            draw_filled_circle_mut(image, (point.x, point.y), KEYPOINT_RADIUS, HAND_COLOR);
        }
    }
}

/// Top strip: the filled share is time worked so far, the badge on the right
/// is the current status.
fn draw_status_strip(image: &mut RgbImage, snapshot: &MonitorSnapshot) {
    let (width, height) = image.dimensions();
    let strip_height = STATUS_STRIP_HEIGHT.min(height);
    if width == 0 || strip_height == 0 {
        return;
    }

    draw_filled_rect_mut(image, Rect::at(0, 0).of_size(width, strip_height), STRIP_BACKGROUND);

    let badge_width = STATUS_BADGE_WIDTH.min(width);
    let bar_width = width - badge_width;
    let filled = (bar_width as f64 * snapshot.work_ratio()).round() as u32;
    if filled > 0 {
        draw_filled_rect_mut(image, Rect::at(0, 0).of_size(filled, strip_height), WORKING_COLOR);
    }

    let badge_color = match snapshot.state {
        ZoneStatus::Working => WORKING_COLOR,
        ZoneStatus::Paused => PAUSED_COLOR,
    };
    draw_filled_rect_mut(
        image,
        Rect::at(bar_width as i32, 0).of_size(badge_width, strip_height),
        badge_color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::{BoundaryRule, Point};

    fn snapshot(state: ZoneStatus, work: f64, pause: f64) -> MonitorSnapshot {
        MonitorSnapshot {
            state,
            work_seconds: work,
            pause_seconds: pause,
        }
    }

    #[test]
    fn draws_zone_edges_and_hand_points() {
        let mut image = RgbImage::new(100, 100);
        let zones = ZoneSet::new(
            vec![Zone::new(vec![
                Point::new(20, 30),
                Point::new(80, 30),
                Point::new(80, 90),
                Point::new(20, 90),
            ])],
            BoundaryRule::Inclusive,
        );
        let hand = Hand::from_landmarks(vec![Point::new(50, 60), Point::new(55, 70)]).unwrap();

        annotate(&mut image, &[hand], &snapshot(ZoneStatus::Paused, 0.0, 1.0), &zones);

        assert_eq!(*image.get_pixel(50, 30), ZONE_COLOR);
        assert_eq!(*image.get_pixel(20, 60), ZONE_COLOR);
        assert_eq!(*image.get_pixel(50, 60), HAND_COLOR);
        assert_eq!(*image.get_pixel(55, 70), HAND_COLOR);
        assert_eq!(*image.get_pixel(40, 40), Rgb([0, 0, 0]));
    }

    #[test]
    fn status_strip_reflects_state_and_work_share() {
        let mut image = RgbImage::new(124, 40);
        draw_status_strip(&mut image, &snapshot(ZoneStatus::Working, 1.0, 1.0));

        // 100 px bar, half worked.
        assert_eq!(*image.get_pixel(10, 5), WORKING_COLOR);
        assert_eq!(*image.get_pixel(90, 5), STRIP_BACKGROUND);
        assert_eq!(*image.get_pixel(120, 5), WORKING_COLOR);
        assert_eq!(*image.get_pixel(10, 20), Rgb([0, 0, 0]));

        draw_status_strip(&mut image, &snapshot(ZoneStatus::Paused, 0.0, 3.0));
        assert_eq!(*image.get_pixel(10, 5), STRIP_BACKGROUND);
        assert_eq!(*image.get_pixel(120, 5), PAUSED_COLOR);
    }

    #[test]
    fn hands_spanning_the_coordinate_range_are_clipped() {
        let mut image = RgbImage::new(40, 30);
        let hand = Hand::from_landmarks(vec![
            Point::new(i32::MIN, 5),
            Point::new(i32::MAX, 25),
            Point::new(20, 15),
        ])
        .unwrap();

        annotate(&mut image, &[hand], &snapshot(ZoneStatus::Paused, 0.0, 1.0), &ZoneSet::default());

        assert_eq!(*image.get_pixel(10, 25), HAND_COLOR);
        assert_eq!(*image.get_pixel(20, 15), HAND_COLOR);
        assert_eq!(*image.get_pixel(0, 20), Rgb([0, 0, 0]));
    }

    #[test]
    fn tiny_frames_do_not_panic() {
        let mut image = RgbImage::new(3, 2);
        annotate(
            &mut image,
            &[],
            &snapshot(ZoneStatus::Working, 5.0, 0.0),
            &ZoneSet::default(),
        );
        assert_eq!(*image.get_pixel(0, 0), WORKING_COLOR);
    }
}
