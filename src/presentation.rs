//! Score bracket lookup for the text and decoration drawn over the canvas.

use crate::color::Rgb;
use crate::config::CanvasSize;
use crate::score::ScoreState;
use glam::Vec2;

pub const SCORE_TEXT_COLOR: Rgb = Rgb::gray(50);
pub const DECORATION_ALPHA: u8 = 80;
pub const DECORATION_SIZE: f32 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBracket {
    Perfect,
    Excellent,
    Good,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoration {
    pub shape: Shape,
    pub center: Vec2,
    pub size: f32,
    pub color: Rgb,
    pub alpha: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub center: Vec2,
    pub color: Rgb,
}

impl ScoreBracket {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage == 100.0 {
            ScoreBracket::Perfect
        } else if percentage >= 90.0 {
            ScoreBracket::Excellent
        } else if percentage >= 60.0 {
            ScoreBracket::Good
        } else {
            ScoreBracket::Low
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ScoreBracket::Perfect => "Perfect score! Celebrating!",
            ScoreBracket::Excellent => "Congratulations! Excellent result!",
            ScoreBracket::Good => "Good result, keep it up.",
            ScoreBracket::Low => "Keep going...",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            ScoreBracket::Perfect => Rgb::new(255, 200, 0),
            ScoreBracket::Excellent => Rgb::new(0, 200, 50),
            ScoreBracket::Good => Rgb::new(255, 181, 35),
            ScoreBracket::Low => Rgb::gray(150),
        }
    }

    /// Shape and colour of the translucent backdrop under the score.
    /// Perfect scores share the green disc of the excellent bracket.
    pub fn decoration(self) -> Option<(Shape, Rgb)> {
        match self {
            ScoreBracket::Perfect | ScoreBracket::Excellent => {
                Some((Shape::Circle, ScoreBracket::Excellent.color()))
            }
            ScoreBracket::Good => Some((Shape::Square, ScoreBracket::Good.color())),
            ScoreBracket::Low => None,
        }
    }
}

/// Everything drawn on top of the fireworks for one score.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub lines: [TextLine; 2],
    pub decoration: Option<Decoration>,
}

impl Overlay {
    pub fn new(score: &ScoreState, canvas: CanvasSize) -> Self {
        let bracket = ScoreBracket::from_percentage(score.percentage());
        let center = Vec2::new(canvas.width / 2.0, canvas.height / 2.0);

        let decoration = bracket.decoration().map(|(shape, color)| Decoration {
            shape,
            center: center + Vec2::new(0.0, 150.0),
            size: DECORATION_SIZE,
            color,
            alpha: DECORATION_ALPHA,
        });

        Self {
            lines: [
                TextLine {
                    text: bracket.message().to_string(),
                    center: center - Vec2::new(0.0, 50.0),
                    color: bracket.color(),
                },
                TextLine {
                    text: score.label(),
                    center: center + Vec2::new(0.0, 50.0),
                    color: SCORE_TEXT_COLOR,
                },
            ],
            decoration,
        }
    }
}
