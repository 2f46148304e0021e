use super::START_MARKER;
use crate::domain::{Direction, GamvError, ParseResult, VariogramDefinition, VariogramType};
use crate::modules::serialization::parse_numeric_token;
use std::str::FromStr;

/// Positional fields of a `gamv` parameter file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterFile {
    pub data_file: String,
    pub coordinate_columns: [usize; 3],
    pub variable_columns: Vec<usize>,
    pub trim_range: (f64, f64),
    pub output_file: String,
    pub lag_count: usize,
    pub lag_separation: f64,
    pub lag_tolerance: f64,
    pub directions: Vec<Direction>,
    pub standardize_sill: bool,
    pub variograms: Vec<VariogramDefinition>,
}

struct ParameterCursor<'a> {
    lines: Vec<(usize, &'a str)>,
    position: usize,
}

impl<'a> ParameterCursor<'a> {
    fn next_line(&mut self, field: &str) -> ParseResult<(usize, Vec<&'a str>)> {
        let Some((line_number, line)) = self.lines.get(self.position).copied() else {
            return Err(GamvError::parse_failure(
                "PARSE.PARAMETER_TRUNCATED",
                format!("parameter file ended before the {field} line"),
            ));
        };
        self.position += 1;
        Ok((line_number, line.split_whitespace().collect()))
    }

    fn scalar<T: FromStr>(&mut self, field: &str) -> ParseResult<T> {
        let (line_number, tokens) = self.next_line(field)?;
        parse_token(&tokens, 0, line_number, field)
    }

    fn real(&mut self, field: &str) -> ParseResult<f64> {
        let (line_number, tokens) = self.next_line(field)?;
        parse_real(&tokens, 0, line_number, field)
    }
}

fn parse_token<T: FromStr>(
    tokens: &[&str],
    index: usize,
    line_number: usize,
    field: &str,
) -> ParseResult<T> {
    let token = tokens.get(index).ok_or_else(|| {
        GamvError::parse_failure(
            "PARSE.PARAMETER_FIELD",
            format!("line {line_number}: missing {field} value"),
        )
    })?;
    token.parse::<T>().map_err(|_| {
        GamvError::parse_failure(
            "PARSE.PARAMETER_FIELD",
            format!("line {line_number}: invalid {field} value '{token}'"),
        )
    })
}

fn parse_real(
    tokens: &[&str],
    index: usize,
    line_number: usize,
    field: &str,
) -> ParseResult<f64> {
    let token = parse_token::<String>(tokens, index, line_number, field)?;
    parse_numeric_token(&token).ok_or_else(|| {
        GamvError::parse_failure(
            "PARSE.PARAMETER_FIELD",
            format!("line {line_number}: invalid {field} value '{token}'"),
        )
    })
}

/// Reads a parameter file back into its fields. Trailing descriptions on each
/// line are ignored, exactly as the engine ignores them.
pub fn parse_parameter_file(source: &str) -> ParseResult<ParameterFile> {
    let mut numbered = source
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line));
    if !numbered.any(|(_, line)| line.trim_start().starts_with(START_MARKER)) {
        return Err(GamvError::parse_failure(
            "PARSE.PARAMETER_MARKER",
            format!("parameter file has no '{START_MARKER}' line"),
        ));
    }
    let mut cursor = ParameterCursor {
        lines: numbered.collect(),
        position: 0,
    };

    let data_file = cursor.scalar::<String>("data file")?;

    let (line_number, tokens) = cursor.next_line("coordinate columns")?;
    let mut coordinate_columns = [0_usize; 3];
    for (index, column) in coordinate_columns.iter_mut().enumerate() {
        *column = parse_token(&tokens, index, line_number, "coordinate column")?;
    }

    let (line_number, tokens) = cursor.next_line("variable columns")?;
    let variable_count: usize = parse_token(&tokens, 0, line_number, "variable count")?;
    let variable_columns = (1..=variable_count)
        .map(|index| parse_token(&tokens, index, line_number, "variable column"))
        .collect::<ParseResult<Vec<usize>>>()?;

    let (line_number, tokens) = cursor.next_line("trimming limits")?;
    let trim_range = (
        parse_real(&tokens, 0, line_number, "trimming minimum")?,
        parse_real(&tokens, 1, line_number, "trimming maximum")?,
    );

    let output_file = cursor.scalar::<String>("output file")?;
    let lag_count = cursor.scalar("lag count")?;
    let lag_separation = cursor.real("lag separation")?;
    let lag_tolerance = cursor.real("lag tolerance")?;

    let direction_count: usize = cursor.scalar("direction count")?;
    let mut directions = Vec::new();
    for _ in 0..direction_count {
        let (line_number, tokens) = cursor.next_line("direction")?;
        let mut values = [0.0_f64; 6];
        for (index, value) in values.iter_mut().enumerate() {
            *value = parse_real(&tokens, index, line_number, "direction parameter")?;
        }
        directions.push(Direction::from_array(values));
    }

    let standardize: u8 = cursor.scalar("standardize flag")?;

    let variogram_count: usize = cursor.scalar("variogram count")?;
    let mut variograms = Vec::new();
    for _ in 0..variogram_count {
        let (line_number, tokens) = cursor.next_line("variogram")?;
        let tail = parse_token(&tokens, 0, line_number, "variogram tail")?;
        let head = parse_token(&tokens, 1, line_number, "variogram head")?;
        let type_code: u8 = parse_token(&tokens, 2, line_number, "variogram type")?;
        let cutoff = match VariogramType::from_code(type_code) {
            Some(kind) if kind.is_indicator() => {
                Some(parse_real(&tokens, 3, line_number, "variogram cutoff")?)
            }
            _ => None,
        };
        variograms.push(VariogramDefinition::new(tail, head, type_code, cutoff));
    }

    Ok(ParameterFile {
        data_file,
        coordinate_columns,
        variable_columns,
        trim_range,
        output_file,
        lag_count,
        lag_separation,
        lag_tolerance,
        directions,
        standardize_sill: standardize != 0,
        variograms,
    })
}
