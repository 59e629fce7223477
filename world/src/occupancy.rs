//! Dense occupancy grid backing the world's occupancy probe.

use scavenger_core::{ActorId, CellCoord, Occupant};

/// Blocking entity per cell, border terrain included.
///
/// Pickups never appear here: they are triggers rather than blockers, so the
/// grid only answers "can an actor enter this cell".
#[derive(Clone, Debug, Default)]
pub(crate) struct OccupancyGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<Occupant>>,
}

impl OccupancyGrid {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<Occupant> {
        match self.index(cell) {
            Some(index) => self.cells.get(index).copied().flatten(),
            None => Some(Occupant::Terrain),
        }
    }

    pub(crate) fn is_vacant(&self, cell: CellCoord) -> bool {
        self.occupant(cell).is_none()
    }

    pub(crate) fn occupy(&mut self, cell: CellCoord, occupant: Occupant) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(occupant);
            }
        }
    }

    pub(crate) fn vacate(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = None;
            }
        }
    }

    /// Walks the straight segment between two cell centres and reports the first
    /// blocking entity other than `exclude`. The start cell is never reported.
    pub(crate) fn probe(
        &self,
        from: CellCoord,
        to: CellCoord,
        exclude: Option<ActorId>,
    ) -> Option<Occupant> {
        segment_cells(from, to)
            .into_iter()
            .skip(1)
            .find_map(|cell| match self.occupant(cell) {
                Some(Occupant::Actor(id)) if Some(id) == exclude => None,
                other => other,
            })
    }

    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Cells crossed by the segment between two cell centres, endpoints included.
fn segment_cells(from: CellCoord, to: CellCoord) -> Vec<CellCoord> {
    let (mut x, mut y) = (i64::from(from.column()), i64::from(from.row()));
    let (end_x, end_y) = (i64::from(to.column()), i64::from(to.row()));
    let delta_x = (end_x - x).abs();
    let delta_y = -(end_y - y).abs();
    let step_x = if x < end_x { 1 } else { -1 };
    let step_y = if y < end_y { 1 } else { -1 };
    let mut error = delta_x + delta_y;

    let mut cells = Vec::new();
    loop {
        if let (Ok(column), Ok(row)) = (u32::try_from(x), u32::try_from(y)) {
            cells.push(CellCoord::new(column, row));
        }
        if x == end_x && y == end_y {
            break;
        }
        let doubled = 2 * error;
        if doubled >= delta_y {
            error += delta_y;
            x += step_x;
        }
        if doubled <= delta_x {
            error += delta_x;
            y += step_y;
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use scavenger_core::ObstacleId;

    #[test]
    fn cells_outside_the_grid_read_as_terrain() {
        let grid = OccupancyGrid::new(3, 3);
        assert_eq!(grid.occupant(CellCoord::new(3, 0)), Some(Occupant::Terrain));
        assert_eq!(grid.occupant(CellCoord::new(1, 1)), None);
    }

    #[test]
    fn probe_skips_the_start_cell_and_the_excluded_actor() {
        let mut grid = OccupancyGrid::new(4, 4);
        let mover = ActorId::new(0);
        grid.occupy(CellCoord::new(1, 1), Occupant::Actor(mover));

        assert_eq!(
            grid.probe(CellCoord::new(1, 1), CellCoord::new(2, 1), Some(mover)),
            None
        );

        grid.occupy(CellCoord::new(2, 1), Occupant::Actor(mover));
        assert_eq!(
            grid.probe(CellCoord::new(1, 1), CellCoord::new(2, 1), Some(mover)),
            None
        );
    }

    #[test]
    fn probe_reports_first_blocker_along_long_segment() {
        let mut grid = OccupancyGrid::new(6, 3);
        let wall = Occupant::Obstacle(ObstacleId::new(7));
        grid.occupy(CellCoord::new(3, 1), wall);
        grid.occupy(CellCoord::new(4, 1), Occupant::Terrain);

        assert_eq!(
            grid.probe(CellCoord::new(1, 1), CellCoord::new(5, 1), None),
            Some(wall)
        );
    }

    #[test]
    fn segment_cells_include_both_endpoints() {
        let cells = segment_cells(CellCoord::new(2, 2), CellCoord::new(2, 4));
        assert_eq!(
            cells,
            vec![
                CellCoord::new(2, 2),
                CellCoord::new(2, 3),
                CellCoord::new(2, 4)
            ]
        );
    }
}
