/// Logical position of one data row in the engine output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    pub variogram: usize,
    pub direction: usize,
    pub lag: usize,
}

impl RowKey {
    pub const fn new(variogram: usize, direction: usize, lag: usize) -> Self {
        Self {
            variogram,
            direction,
            lag,
        }
    }
}

/// Block geometry of a `gamv` output file. Each (variogram, direction) pair
/// writes one header line followed by `lag_count + 2` data lines, variogram
/// major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLayout {
    variogram_count: usize,
    direction_count: usize,
    lag_count: usize,
}

impl OutputLayout {
    pub const fn new(variogram_count: usize, direction_count: usize, lag_count: usize) -> Self {
        Self {
            variogram_count,
            direction_count,
            lag_count,
        }
    }

    pub const fn variogram_count(&self) -> usize {
        self.variogram_count
    }

    pub const fn direction_count(&self) -> usize {
        self.direction_count
    }

    pub const fn lag_count(&self) -> usize {
        self.lag_count
    }

    /// Lag classes reported per block: the zero lag, the requested lags and
    /// the overflow class.
    pub const fn lags_per_block(&self) -> usize {
        self.lag_count + 2
    }

    pub const fn block_len(&self) -> usize {
        self.lags_per_block() + 1
    }

    pub const fn block_count(&self) -> usize {
        self.variogram_count * self.direction_count
    }

    pub const fn data_row_count(&self) -> usize {
        self.block_count() * self.lags_per_block()
    }

    pub const fn total_line_count(&self) -> usize {
        self.block_count() * self.block_len()
    }

    /// `line` is 0-based over the whole file.
    pub const fn is_header_line(&self, line: usize) -> bool {
        line % self.block_len() == 0
    }

    /// `None` past the last data row, which covers layouts with no blocks.
    pub const fn row_key(&self, ordinal: usize) -> Option<RowKey> {
        if ordinal >= self.data_row_count() {
            return None;
        }
        let lags = self.lags_per_block();
        Some(RowKey {
            variogram: ordinal / (self.direction_count * lags),
            direction: (ordinal / lags) % self.direction_count,
            lag: ordinal % lags,
        })
    }

    pub const fn ordinal(&self, key: RowKey) -> Option<usize> {
        if key.variogram >= self.variogram_count
            || key.direction >= self.direction_count
            || key.lag >= self.lags_per_block()
        {
            return None;
        }
        Some(
            (key.variogram * self.direction_count + key.direction) * self.lags_per_block()
                + key.lag,
        )
    }
}
