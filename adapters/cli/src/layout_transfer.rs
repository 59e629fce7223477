use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use scavenger_core::{CellCoord, LevelLayout, PlacementGroup};
use serde::{Deserialize, Serialize};

/// Leading fields of every layout code this build writes and accepts.
pub(crate) const CODE_HEADER: &str = "scav:v1";

/// Single-line transfer code describing one complete level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LayoutCode {
    layout: LevelLayout,
}

/// Board contents carried in the payload; the size travels in the header.
#[derive(Serialize, Deserialize)]
struct Board {
    border: Vec<CellCoord>,
    groups: Vec<PlacementGroup>,
    exit: CellCoord,
    player_start: CellCoord,
}

impl LayoutCode {
    pub(crate) fn new(layout: LevelLayout) -> Self {
        Self { layout }
    }

    pub(crate) fn into_layout(self) -> LevelLayout {
        self.layout
    }

    /// Writes `scav:v1:<columns>x<rows>:<base64 json>`.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let board = Board {
            border: self.layout.border.clone(),
            groups: self.layout.groups.clone(),
            exit: self.layout.exit,
            player_start: self.layout.player_start,
        };
        let json = serde_json::to_vec(&board).map_err(LayoutTransferError::Json)?;
        Ok(format!(
            "{CODE_HEADER}:{}x{}:{}",
            self.layout.columns,
            self.layout.rows,
            STANDARD_NO_PAD.encode(json)
        ))
    }

    /// Reads a code written by [`LayoutCode::encode`] and checks that the
    /// board it describes can be played.
    pub(crate) fn decode(code: &str) -> Result<Self, LayoutTransferError> {
        let code = code.trim();
        let (size, payload) = code
            .strip_prefix(CODE_HEADER)
            .and_then(|rest| rest.strip_prefix(':'))
            .and_then(|rest| rest.split_once(':'))
            .ok_or_else(|| LayoutTransferError::Header(code.to_owned()))?;

        let (columns, rows) = board_size(size)?;
        let json = STANDARD_NO_PAD
            .decode(payload)
            .map_err(LayoutTransferError::Base64)?;
        let board: Board = serde_json::from_slice(&json).map_err(LayoutTransferError::Json)?;

        let layout = LevelLayout {
            columns,
            rows,
            border: board.border,
            groups: board.groups,
            exit: board.exit,
            player_start: board.player_start,
        };
        check_playable(&layout)?;
        Ok(Self { layout })
    }
}

fn board_size(size: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::Size(size.to_owned());
    let (columns, rows) = size.split_once('x').ok_or_else(invalid)?;
    let columns: u32 = columns.parse().map_err(|_| invalid())?;
    let rows: u32 = rows.parse().map_err(|_| invalid())?;
    if columns < 3 || rows < 3 {
        return Err(invalid());
    }
    Ok((columns, rows))
}

/// The world only seats the player on a free interior cell distinct from the exit.
fn check_playable(layout: &LevelLayout) -> Result<(), LayoutTransferError> {
    let (columns, rows) = (layout.columns, layout.rows);
    let outside = layout
        .border
        .iter()
        .chain(layout.entities().map(|entity| &entity.cell))
        .chain([&layout.exit, &layout.player_start])
        .find(|cell| cell.column() >= columns || cell.row() >= rows);
    if let Some(cell) = outside {
        return Err(LayoutTransferError::OutsideBoard(*cell));
    }

    let start = layout.player_start;
    let blocked = start.is_border(columns, rows)
        || start == layout.exit
        || layout.border.contains(&start)
        || layout.entities().any(|entity| entity.cell == start);
    if blocked {
        return Err(LayoutTransferError::StartBlocked(start));
    }
    Ok(())
}

/// Reasons a layout code could not be written or read.
#[derive(Debug)]
pub(crate) enum LayoutTransferError {
    /// The code does not begin with `scav:v1:<size>:`.
    Header(String),
    /// The size field is not `<columns>x<rows>` with both at least 3.
    Size(String),
    /// The payload is not valid unpadded base64.
    Base64(base64::DecodeError),
    /// The payload JSON could not be written or read.
    Json(serde_json::Error),
    /// A cell lies beyond the declared board size.
    OutsideBoard(CellCoord),
    /// The player start is on the border, the exit, or under another entity.
    StartBlocked(CellCoord),
}

impl fmt::Display for LayoutTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header(code) => write!(f, "'{code}' is not a {CODE_HEADER} layout code"),
            Self::Size(size) => write!(f, "board size '{size}' is not <columns>x<rows>"),
            Self::Base64(error) => write!(f, "layout payload is not base64: {error}"),
            Self::Json(error) => write!(f, "layout payload is unreadable: {error}"),
            Self::OutsideBoard(cell) => write!(
                f,
                "cell ({}, {}) lies outside the board",
                cell.column(),
                cell.row()
            ),
            Self::StartBlocked(cell) => write!(
                f,
                "player start ({}, {}) is not a free interior cell",
                cell.column(),
                cell.row()
            ),
        }
    }
}

impl Error for LayoutTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Base64(error) => Some(error),
            Self::Json(error) => Some(error),
            _ => None,
        }
    }
}
