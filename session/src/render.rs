//! Drawing the maze onto any line-and-circle surface

use maze_core::{GameConfig, Maze, Position};
use std::fmt::Write;

pub const WALL_COLOR: &str = "#4a5568";
pub const WALL_WIDTH: f32 = 2.0;
pub const PLAYER_COLOR: &str = "#e53e3e";
pub const GOAL_COLOR: &str = "#38a169";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Minimal drawing surface
pub trait Canvas {
    fn clear(&mut self, width: u32, height: u32);
    fn line(&mut self, from: Point, to: Point, color: &str, width: f32);
    fn fill_circle(&mut self, center: Point, radius: f32, color: &str);
}

/// Pixel geometry of a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub cell_size: u32,
    pub player_size: u32,
}

impl Default for Layout {
    fn default() -> Self {
        GameConfig::default().into()
    }
}

impl From<GameConfig> for Layout {
    fn from(config: GameConfig) -> Self {
        Self {
            cell_size: config.cell_size,
            player_size: config.player_size,
        }
    }
}

impl Layout {
    /// Canvas dimensions in pixels, saturating at `u32::MAX`
    pub fn canvas_size(&self, maze: &Maze) -> (u32, u32) {
        (self.span(maze.width()), self.span(maze.height()))
    }

    fn span(&self, cells: usize) -> u32 {
        u32::try_from(cells).unwrap_or(u32::MAX).saturating_mul(self.cell_size)
    }

    fn cell_center(&self, pos: Position) -> Point {
        let size = self.cell_size as f32;
        Point::new(pos.x as f32 * size + size / 2.0, pos.y as f32 * size + size / 2.0)
    }
}

/// Draw every standing wall, the player, and the goal
pub fn draw_scene<C: Canvas + ?Sized>(canvas: &mut C, maze: &Maze, player: Position, layout: Layout) {
    let (width, height) = layout.canvas_size(maze);
    canvas.clear(width, height);

    let size = layout.cell_size as f32;
    for (pos, cell) in maze.cells() {
        let x = pos.x as f32 * size;
        let y = pos.y as f32 * size;

        if cell.top() {
            canvas.line(Point::new(x, y), Point::new(x + size, y), WALL_COLOR, WALL_WIDTH);
        }
        if cell.right() {
            canvas.line(Point::new(x + size, y), Point::new(x + size, y + size), WALL_COLOR, WALL_WIDTH);
        }
        if cell.bottom() {
            canvas.line(Point::new(x, y + size), Point::new(x + size, y + size), WALL_COLOR, WALL_WIDTH);
        }
        if cell.left() {
            canvas.line(Point::new(x, y), Point::new(x, y + size), WALL_COLOR, WALL_WIDTH);
        }
    }

    let radius = layout.player_size as f32 / 2.0;
    canvas.fill_circle(layout.cell_center(player), radius, PLAYER_COLOR);
    canvas.fill_circle(layout.cell_center(maze.goal()), radius, GOAL_COLOR);
}

/// Builds a standalone SVG document
#[derive(Debug, Default, Clone)]
pub struct SvgCanvas {
    width: u32,
    height: u32,
    body: String,
}

impl SvgCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

impl Canvas for SvgCanvas {
    fn clear(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.body.clear();
    }

    fn line(&mut self, from: Point, to: Point, color: &str, width: f32) {
        // writing into a String cannot fail
        let _ = writeln!(
            self.body,
            "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            from.x, from.y, to.x, to.y, color, width
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: &str) {
        let _ = writeln!(
            self.body,
            "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
            center.x, center.y, radius, color
        );
    }
}

/// Render the scene to an SVG string
pub fn render_svg(maze: &Maze, player: Position, layout: Layout) -> String {
    let mut canvas = SvgCanvas::new();
    draw_scene(&mut canvas, maze, player, layout);
    canvas.finish()
}

/// Text rendering for terminals: `#` wall, `@` player, `G` goal
pub fn render_ascii(maze: &Maze, player: Position) -> String {
    let grid = maze.to_binary_grid();
    let goal = maze.goal();
    let mut out = String::with_capacity(grid.len() * (grid[0].len() + 1));

    for (gr, row) in grid.iter().enumerate() {
        for (gc, &value) in row.iter().enumerate() {
            let at = |pos: Position| gr == pos.y * 2 + 1 && gc == pos.x * 2 + 1;
            let ch = if at(player) {
                '@'
            } else if at(goal) {
                'G'
            } else if value == 0 {
                '#'
            } else {
                ' '
            };
            out.push(ch);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        size: Option<(u32, u32)>,
        lines: Vec<(Point, Point)>,
        circles: Vec<(Point, f32, String)>,
    }

    impl Canvas for Recorder {
        fn clear(&mut self, width: u32, height: u32) {
            self.size = Some((width, height));
        }

        fn line(&mut self, from: Point, to: Point, _color: &str, _width: f32) {
            self.lines.push((from, to));
        }

        fn fill_circle(&mut self, center: Point, radius: f32, color: &str) {
            self.circles.push((center, radius, color.to_string()));
        }
    }

    fn standing_walls(maze: &Maze) -> usize {
        maze.cells()
            .map(|(_, cell)| [cell.top(), cell.right(), cell.bottom(), cell.left()].iter().filter(|&&w| w).count())
            .sum()
    }

    #[test]
    fn test_draw_scene_primitives() {
        let maze = Maze::from_seed(10, 8, 2024);
        let mut canvas = Recorder::default();
        draw_scene(&mut canvas, &maze, Position::new(0, 0), Layout::default());

        assert_eq!(canvas.size, Some((250, 200)));
        assert_eq!(canvas.lines.len(), standing_walls(&maze));
        assert_eq!(canvas.circles.len(), 2);

        let (player, radius, color) = &canvas.circles[0];
        assert_eq!(*player, Point::new(12.5, 12.5));
        assert_eq!(*radius, 7.5);
        assert_eq!(color, PLAYER_COLOR);

        let (goal, _, color) = &canvas.circles[1];
        assert_eq!(*goal, Point::new(237.5, 187.5));
        assert_eq!(color, GOAL_COLOR);
    }

    #[test]
    fn test_single_cell_draws_four_walls() {
        let maze = Maze::from_seed(1, 1, 1);
        let mut canvas = Recorder::default();
        draw_scene(&mut canvas, &maze, Position::new(0, 0), Layout::default());
        assert_eq!(canvas.lines.len(), 4);
        assert_eq!(canvas.circles[0].0, canvas.circles[1].0);
    }

    #[test]
    fn test_canvas_size_saturates() {
        let maze = Maze::from_seed(3, 1, 1);
        let layout = Layout {
            cell_size: u32::MAX / 2,
            player_size: 15,
        };
        assert_eq!(layout.canvas_size(&maze), (u32::MAX, u32::MAX / 2));
        assert_eq!(Layout::default().canvas_size(&maze), (75, 25));
    }

    #[test]
    fn test_svg_document() {
        let maze = Maze::from_seed(10, 8, 5);
        let svg = render_svg(&maze, Position::new(3, 2), Layout::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("width=\"250\" height=\"200\""));
        assert!(svg.contains("<circle cx=\"87.5\" cy=\"62.5\" r=\"7.5\" fill=\"#e53e3e\"/>"));
        assert!(svg.contains(GOAL_COLOR));
        assert_eq!(svg.matches("<line").count(), standing_walls(&maze));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_svg_canvas_clear_resets_body() {
        let mut canvas = SvgCanvas::new();
        canvas.clear(10, 10);
        canvas.fill_circle(Point::new(1.0, 1.0), 1.0, "red");
        canvas.clear(20, 20);
        let svg = canvas.finish();
        assert!(!svg.contains("<circle"));
        assert!(svg.contains("width=\"20\""));
    }

    #[test]
    fn test_ascii_render() {
        let maze = Maze::from_seed(10, 8, 5);
        let text = render_ascii(&maze, Position::new(0, 0));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 17);
        assert!(lines.iter().all(|line| line.chars().count() == 21));
        assert_eq!(lines[1].chars().nth(1), Some('@'));
        assert_eq!(lines[15].chars().nth(19), Some('G'));
        assert!(lines[0].chars().all(|c| c == '#'));
    }
}
