//! Parser for the ASCII AIGER format.
//!
//! Only the combinational part of the format is kept: latches are degraded to free inputs,
//! their next state and reset value are discarded.

use std::{
    collections::{HashMap, hash_map::Entry},
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use log::{debug, warn};

use crate::{Aig, Literal, Result, aig::error::ParserError};

fn read_u32(s: &str) -> std::result::Result<u32, ParserError> {
    s.parse::<u32>()
        .map_err(|_| ParserError::InvalidToken(s.to_string() + " expected u32"))
}

fn check_even(x: u32) -> std::result::Result<(), ParserError> {
    if x & 1 == 1 {
        return Err(ParserError::InvalidToken(
            "expected literal to be even, got ".to_string() + &x.to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    m: u32,
    i: u32,
    l: u32,
    o: u32,
    a: u32,
}

impl TryFrom<&str> for Header {
    type Error = ParserError;

    fn try_from(line: &str) -> std::result::Result<Self, Self::Error> {
        let tokens = line.split_whitespace().collect::<Vec<&str>>();

        match tokens.first() {
            Some(&"aag") => (),
            Some(&"aig") => {
                return Err(ParserError::UnsupportedFeature(
                    "binary AIGER format, only aag is supported".to_string(),
                ));
            }
            _ => {
                return Err(ParserError::InvalidToken("expected aag header".to_string()));
            }
        }

        if tokens.len() < 6 {
            return Err(ParserError::InvalidToken(
                "missing header tokens".to_string(),
            ));
        }

        if tokens.len() > 6 {
            return Err(ParserError::UnsupportedFeature(
                "header only supports M I L O A".to_string(),
            ));
        }

        Ok(Header {
            m: read_u32(tokens[1])?,
            i: read_u32(tokens[2])?,
            l: read_u32(tokens[3])?,
            o: read_u32(tokens[4])?,
            a: read_u32(tokens[5])?,
        })
    }
}

/// Reads the next line, failing on a truncated file.
fn next_line(reader: &mut impl BufRead, line: &mut String) -> std::result::Result<(), ParserError> {
    line.clear();
    if reader.read_line(line)? == 0 {
        return Err(ParserError::InvalidToken(
            "unexpected end of file".to_string(),
        ));
    }
    Ok(())
}

fn read_input(line: &str) -> std::result::Result<u32, ParserError> {
    let tokens = line.split_whitespace().collect::<Vec<&str>>();

    if tokens.is_empty() {
        return Err(ParserError::InvalidToken(
            "expected input token, got nothing".to_string(),
        ));
    }

    if tokens.len() > 1 {
        return Err(ParserError::InvalidToken(
            "expected nothing after input, got ".to_string() + tokens[1],
        ));
    }

    let i = read_u32(tokens[0])?;
    check_even(i)?;
    Ok(i >> 1)
}

/// Only the current state of the latch is kept.
fn read_latch(line: &str) -> std::result::Result<u32, ParserError> {
    let tokens = line.split_whitespace().collect::<Vec<&str>>();

    if tokens.len() < 2 {
        return Err(ParserError::InvalidToken(
            "not enough latch tokens".to_string(),
        ));
    }

    if tokens.len() > 3 {
        return Err(ParserError::InvalidToken(
            "expected nothing after latch, got ".to_string() + tokens[3],
        ));
    }

    let lhs = read_u32(tokens[0])?;
    check_even(lhs)?;
    // Still checking the discarded tokens are numbers
    for token in &tokens[1..] {
        read_u32(token)?;
    }
    Ok(lhs >> 1)
}

fn read_output(line: &str) -> std::result::Result<u32, ParserError> {
    let tokens = line.split_whitespace().collect::<Vec<&str>>();

    if tokens.is_empty() {
        return Err(ParserError::InvalidToken(
            "expected output token, got nothing".to_string(),
        ));
    }

    if tokens.len() > 1 {
        return Err(ParserError::InvalidToken(
            "expected nothing after output, got ".to_string() + tokens[1],
        ));
    }

    read_u32(tokens[0])
}

fn read_and(line: &str) -> std::result::Result<(u32, u32, u32), ParserError> {
    let tokens = line.split_whitespace().collect::<Vec<&str>>();

    if tokens.len() < 3 {
        return Err(ParserError::InvalidToken("not enough and tokens".to_string()));
    }

    if tokens.len() > 3 {
        return Err(ParserError::InvalidToken(
            "expected nothing after and tokens, got ".to_string() + tokens[3],
        ));
    }

    let lhs = read_u32(tokens[0])?;
    let rhs0 = read_u32(tokens[1])?;
    let rhs1 = read_u32(tokens[2])?;

    check_even(lhs)?;
    Ok((lhs >> 1, rhs0, rhs1))
}

/// Maps AIGER variables to literals of the AIG under construction.
///
/// Only defined variables are stored, the header's `M` is a bound and not a size.
struct VariableMap {
    /// Maximum variable index announced by the header.
    m: u32,
    lits: HashMap<u32, Literal>,
}

impl VariableMap {
    fn new(m: u32) -> Self {
        // Variable 0 is the constant false
        VariableMap {
            m,
            lits: HashMap::from([(0, Literal::FALSE)]),
        }
    }

    fn define(&mut self, var: u32, lit: Literal) -> std::result::Result<(), ParserError> {
        if var > self.m {
            return Err(ParserError::InvalidToken(format!(
                "variable {} is above the maximum variable index",
                var
            )));
        }
        match self.lits.entry(var) {
            Entry::Occupied(_) => Err(ParserError::InvalidToken(format!(
                "variable {} is defined twice",
                var
            ))),
            Entry::Vacant(entry) => {
                entry.insert(lit);
                Ok(())
            }
        }
    }

    /// Translates an AIGER literal, the variable must already be defined.
    fn resolve(&self, raw: u32) -> std::result::Result<Literal, ParserError> {
        let var = raw >> 1;
        self.lits
            .get(&var)
            .map(|&lit| lit ^ (raw & 1 == 1))
            .ok_or_else(|| ParserError::InvalidToken(format!("undefined variable {}", var)))
    }
}

impl Aig {
    /// Creates an AIG from an open .aag file using ASCII format.
    ///
    /// Use this function if the file is already open with the reader.
    ///
    /// Warning: latches are read as new primary inputs (after the real ones). The sequential
    /// behaviour of the circuit is lost, only its combinational part is kept.
    ///
    /// ```rust
    /// use std::io::BufReader;
    /// use aigopt::Aig;
    /// let file = "aag 3 2 0 1 1\n2\n4\n7\n6 2 4\n";
    /// let aig = Aig::from_ascii(BufReader::new(file.as_bytes())).unwrap();
    /// assert_eq!(aig.metrics().to_string(), "pis=2, pos=1, area=1, depth=1, not=1");
    /// ```
    pub fn from_ascii(mut reader: BufReader<impl Read>) -> Result<Self> {
        let mut line: String = String::new();

        // Reading the header
        next_line(&mut reader, &mut line)?;
        let header = Header::try_from(line.as_str())?;
        debug!("reading aag file with header {:?}", header);

        let mut aig = Aig::new();
        let mut vars = VariableMap::new(header.m);

        for _ in 0..header.i {
            next_line(&mut reader, &mut line)?;
            let var = read_input(&line)?;
            let id = aig.add_input();
            vars.define(var, Literal::new(id, false))?;
        }

        if header.l > 0 {
            warn!(
                "{} latches are read as free inputs, sequential behaviour is discarded",
                header.l
            );
        }
        for _ in 0..header.l {
            next_line(&mut reader, &mut line)?;
            let var = read_latch(&line)?;
            let id = aig.add_input();
            vars.define(var, Literal::new(id, false))?;
        }

        // Outputs may refer to gates which are not defined yet
        let mut outputs = Vec::new();
        for _ in 0..header.o {
            next_line(&mut reader, &mut line)?;
            outputs.push(read_output(&line)?);
        }

        // Gates are in topological order in the file
        for _ in 0..header.a {
            next_line(&mut reader, &mut line)?;
            let (var, rhs0, rhs1) = read_and(&line)?;
            let lit = aig.add_and(vars.resolve(rhs0)?, vars.resolve(rhs1)?)?;
            vars.define(var, lit)?;
        }

        // And finally marking outputs
        for raw in outputs {
            aig.add_output(vars.resolve(raw)?)?;
        }

        // Ignoring everything else (symbols, comments)
        Ok(aig)
    }

    /// Creates an AIG from an .aag file using the ASCII AIGER format.
    ///
    /// This is a homemade "parser" which only supports the combinational subset of the format,
    /// see [`Aig::from_ascii`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(path.as_ref()).map_err(|z| {
            ParserError::IoError(format!("{}: {}", path.as_ref().display(), z))
        })?;
        Aig::from_ascii(BufReader::new(f))
    }
}
