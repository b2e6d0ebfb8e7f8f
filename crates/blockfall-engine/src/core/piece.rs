use std::fmt;

use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize, ser::SerializeStruct as _};

use super::GRID_WIDTH;

/// A falling piece: shape kind, rotation state and anchor position.
///
/// The anchor is the top-left corner of the piece's occupancy matrix in board
/// coordinates. Pieces are immutable values; movement and rotation return new
/// `Piece` instances so that a candidate can be checked against the board
/// before it replaces the current one.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind};
///
/// let piece = Piece::new(PieceKind::T);
/// assert_eq!((piece.position().x(), piece.position().y()), (4, 0));
///
/// let moved = piece.translated(1, 0);
/// let rotated = moved.rotated_right();
/// assert_eq!(rotated.position(), moved.position());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    position: PiecePosition,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Piece", 5)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("color", &self.color())?;
        state.serialize_field("x", &self.position.x)?;
        state.serialize_field("y", &self.position.y)?;
        state.serialize_field("shape", &self.shape())?;
        state.end()
    }
}

impl fmt::Display for Piece {
    /// Formats as `kind#rotation@x,y`, e.g. `S#1@4,18`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.0,
            self.position.x,
            self.position.y
        )
    }
}

impl Piece {
    /// Creates a piece at its spawn position: horizontally centered, top row.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            position: PiecePosition::spawn(kind),
            rotation: PieceRotation::default(),
            kind,
        }
    }

    /// Creates an unrotated piece anchored at the given position.
    #[must_use]
    pub fn at(kind: PieceKind, position: PiecePosition) -> Self {
        Self {
            position,
            rotation: PieceRotation::default(),
            kind,
        }
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn color(&self) -> Rgb {
        self.kind.color()
    }

    /// Returns the occupancy matrix for the current rotation.
    #[must_use]
    pub fn shape(&self) -> ShapeMatrix {
        PIECE_SHAPES[self.kind as usize][self.rotation.as_usize()]
    }

    /// Returns the absolute board coordinates of every occupied cell.
    ///
    /// Coordinates may lie outside the board; see
    /// [`Board::is_colliding`](super::Board::is_colliding). They saturate at
    /// the `i32` bounds, which are far off the board.
    #[must_use]
    pub fn occupied_positions(&self) -> ArrayVec<(i32, i32), 4> {
        let PiecePosition { x: x0, y: y0 } = self.position;
        self.shape()
            .occupied_cells()
            .map(|(dx, dy)| (x0.saturating_add(offset(dx)), y0.saturating_add(offset(dy))))
            .collect()
    }

    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.translated(dx, dy),
            ..*self
        }
    }

    /// Rotates the matrix 90° clockwise around its own origin.
    ///
    /// The anchor is kept as is; no wall kick is attempted.
    #[must_use]
    pub fn rotated_right(&self) -> Self {
        Self {
            rotation: self.rotation.rotated_right(),
            ..*self
        }
    }
}

// Matrix offsets are bounded by the 4x4 shape storage.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn offset(d: usize) -> i32 {
    d as i32
}

/// Anchor position of a piece on the board.
///
/// `(0, 0)` is the top-left cell of the board; x grows rightward and y
/// downward. Coordinates are signed so that a candidate position left of or
/// above the board can be represented and rejected by collision checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Spawn anchor: `GRID_WIDTH / 2 - width / 2`, row 0.
    #[must_use]
    pub fn spawn(kind: PieceKind) -> Self {
        let x = GRID_WIDTH / 2 - kind.shape().width() / 2;
        Self::new(offset(x), 0)
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    /// Offsets the position, saturating at the `i32` bounds.
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Rotation state of a piece.
///
/// Number of clockwise quarter turns applied to the base matrix, modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub fn rotated_right(self) -> Self {
        PieceRotation((self.0 + 1) % 4)
    }

    #[must_use]
    pub fn quarter_turns(self) -> u8 {
        self.0
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// RGB color associated with a piece kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

/// Uniform choice over the seven kinds.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the unrotated occupancy matrix.
    #[must_use]
    pub const fn shape(self) -> ShapeMatrix {
        PIECE_SHAPES[self as usize][0]
    }

    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            PieceKind::I => Rgb::new(0, 255, 255),
            PieceKind::O => Rgb::new(255, 255, 0),
            PieceKind::T => Rgb::new(255, 0, 255),
            PieceKind::S => Rgb::new(0, 255, 0),
            PieceKind::Z => Rgb::new(255, 0, 0),
            PieceKind::J => Rgb::new(0, 0, 255),
            PieceKind::L => Rgb::new(255, 165, 0),
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

/// Occupancy matrix of a piece (up to 4×4 cells).
///
/// Rows are indexed by y (top to bottom) and columns by x (left to right).
/// Cells outside `width × height` are always empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMatrix {
    width: usize,
    height: usize,
    cells: [[bool; 4]; 4],
}

impl Serialize for ShapeMatrix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: ["010", "111"] ('1' = occupied)
        serializer.collect_seq(self.rows().map(|row| {
            row.iter()
                .map(|&cell| if cell { '1' } else { '0' })
                .collect::<String>()
        }))
    }
}

impl ShapeMatrix {
    const fn from_rows<const W: usize, const H: usize>(rows: [[u8; W]; H]) -> Self {
        assert!(W <= 4 && H <= 4);
        let mut cells = [[false; 4]; 4];
        let mut y = 0;
        while y < H {
            let mut x = 0;
            while x < W {
                cells[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }
        Self {
            width: W,
            height: H,
            cells,
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns an iterator over the rows, each trimmed to the matrix width.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells[..self.height]
            .iter()
            .map(|row| &row[..self.width])
    }

    /// Returns the `(x, y)` offsets of occupied cells, row by row.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, &cell)| cell.then_some((x, y)))
        })
    }

    /// Transposes the matrix and reverses its row order (90° clockwise).
    #[must_use]
    pub const fn rotated_right(&self) -> Self {
        let mut cells = [[false; 4]; 4];
        let mut y = 0;
        while y < self.width {
            let mut x = 0;
            while x < self.height {
                cells[y][x] = self.cells[self.height - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }
}

const fn shape_rotations(base: ShapeMatrix) -> [ShapeMatrix; 4] {
    let mut rotates = [base; 4];
    let mut i = 1;
    while i < 4 {
        rotates[i] = rotates[i - 1].rotated_right();
        i += 1;
    }
    rotates
}

const PIECE_SHAPES: [[ShapeMatrix; 4]; PieceKind::LEN] = [
    // I-piece
    shape_rotations(ShapeMatrix::from_rows([[1, 1, 1, 1]])),
    // O-piece
    shape_rotations(ShapeMatrix::from_rows([[1, 1], [1, 1]])),
    // T-piece
    shape_rotations(ShapeMatrix::from_rows([[0, 1, 0], [1, 1, 1]])),
    // S-piece
    shape_rotations(ShapeMatrix::from_rows([[0, 1, 1], [1, 1, 0]])),
    // Z-piece
    shape_rotations(ShapeMatrix::from_rows([[1, 1, 0], [0, 1, 1]])),
    // J-piece
    shape_rotations(ShapeMatrix::from_rows([[1, 0, 0], [1, 1, 1]])),
    // L-piece
    shape_rotations(ShapeMatrix::from_rows([[0, 0, 1], [1, 1, 1]])),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_of(shape: ShapeMatrix) -> Vec<Vec<bool>> {
        shape.rows().map(<[bool]>::to_vec).collect()
    }

    #[test]
    fn test_spawn_positions_are_centered() {
        let expected = [
            (PieceKind::I, 3),
            (PieceKind::O, 4),
            (PieceKind::T, 4),
            (PieceKind::S, 4),
            (PieceKind::Z, 4),
            (PieceKind::J, 4),
            (PieceKind::L, 4),
        ];
        for (kind, x) in expected {
            let piece = Piece::new(kind);
            assert_eq!(piece.position(), PiecePosition::new(x, 0), "{kind:?}");
        }
    }

    #[test]
    fn test_every_shape_has_four_cells() {
        for kind in PieceKind::ALL {
            let mut piece = Piece::new(kind);
            for _ in 0..4 {
                assert_eq!(piece.occupied_positions().len(), 4, "{piece}");
                piece = piece.rotated_right();
            }
        }
    }

    #[test]
    fn test_rotate_transposes_and_reverses_rows() {
        // [0 1 0]      [1 0]
        // [1 1 1]  ->  [1 1]
        //              [1 0]
        let rotated = PieceKind::T.shape().rotated_right();
        assert_eq!((rotated.width(), rotated.height()), (2, 3));
        assert_eq!(
            rows_of(rotated),
            vec![vec![true, false], vec![true, true], vec![true, false]]
        );

        let rotated = PieceKind::I.shape().rotated_right();
        assert_eq!((rotated.width(), rotated.height()), (1, 4));
    }

    #[test]
    fn test_four_rotations_restore_shape() {
        for kind in PieceKind::ALL {
            let base = kind.shape();
            let mut shape = base;
            for _ in 0..4 {
                shape = shape.rotated_right();
            }
            assert_eq!(shape, base, "{kind:?}");
        }
        assert_eq!(PieceKind::O.shape().rotated_right(), PieceKind::O.shape());
        assert_eq!(
            PieceKind::I.shape().rotated_right().rotated_right(),
            PieceKind::I.shape()
        );
    }

    #[test]
    fn test_piece_shape_follows_rotation_state() {
        let piece = Piece::new(PieceKind::L).rotated_right();
        assert_eq!(piece.rotation().quarter_turns(), 1);
        assert_eq!(piece.shape(), PieceKind::L.shape().rotated_right());
        assert_eq!(piece.position(), Piece::new(PieceKind::L).position());
    }

    #[test]
    fn test_occupied_positions_are_absolute() {
        let piece = Piece::at(PieceKind::S, PiecePosition::new(2, -1));
        let cells: Vec<_> = piece.occupied_positions().into_iter().collect();
        assert_eq!(cells, vec![(3, -1), (4, -1), (2, 0), (3, 0)]);
    }

    #[test]
    fn test_translation_saturates() {
        let piece = Piece::at(PieceKind::I, PiecePosition::new(i32::MAX - 1, i32::MIN));
        let far = piece.translated(i32::MAX, -1);
        assert_eq!(far.position(), PiecePosition::new(i32::MAX, i32::MIN));
        for (x, y) in far.occupied_positions() {
            assert_eq!((x, y), (i32::MAX, i32::MIN));
        }
    }

    #[test]
    fn test_piece_display() {
        let piece = Piece::new(PieceKind::S).rotated_right().translated(0, 18);
        assert_eq!(piece.to_string(), "S#1@4,18");
    }

    #[test]
    fn test_piece_serialization() {
        let piece = Piece::new(PieceKind::T);
        let value = serde_json::to_value(piece).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "kind": "T",
                "color": { "r": 255, "g": 0, "b": 255 },
                "x": 4,
                "y": 0,
                "shape": ["010", "111"],
            })
        );
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('t'), None);
    }

    #[test]
    fn test_colors_are_distinct() {
        for (i, a) in PieceKind::ALL.iter().enumerate() {
            for b in &PieceKind::ALL[i + 1..] {
                assert_ne!(a.color(), b.color());
            }
        }
    }
}
