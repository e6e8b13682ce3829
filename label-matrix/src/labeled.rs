use crate::common_io::{ensure_parent_dir, open_buf_reader};
use nalgebra::DMatrix;
use std::collections::{HashMap, HashSet};
use std::io::{BufWriter, Write};

pub type Mat = DMatrix<f64>;

/// A dense 2-D numeric container keyed by unique row and column labels.
///
/// Row/column label order matches the matrix dimensions and label-to-index
/// lookup is O(1). All mutation goes through methods so the index maps stay
/// consistent with the data.
#[derive(Clone, Debug)]
pub struct LabeledMatrix {
    mat: Mat,
    rows: Vec<Box<str>>,
    cols: Vec<Box<str>>,
    row_index: HashMap<Box<str>, usize>,
    col_index: HashMap<Box<str>, usize>,
}

fn build_index(labels: &[Box<str>]) -> anyhow::Result<HashMap<Box<str>, usize>> {
    let mut index = HashMap::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        if index.insert(label.clone(), i).is_some() {
            anyhow::bail!("duplicate label: {}", label);
        }
    }
    Ok(index)
}

impl LabeledMatrix {
    pub fn new(mat: Mat, rows: Vec<Box<str>>, cols: Vec<Box<str>>) -> anyhow::Result<Self> {
        if rows.len() != mat.nrows() {
            anyhow::bail!(
                "{} row labels for a matrix with {} rows",
                rows.len(),
                mat.nrows()
            );
        }
        if cols.len() != mat.ncols() {
            anyhow::bail!(
                "{} column labels for a matrix with {} columns",
                cols.len(),
                mat.ncols()
            );
        }
        let row_index = build_index(&rows)?;
        let col_index = build_index(&cols)?;
        Ok(Self {
            mat,
            rows,
            cols,
            row_index,
            col_index,
        })
    }

    /// Constant-filled matrix over the given label universe
    pub fn from_element(
        rows: Vec<Box<str>>,
        cols: Vec<Box<str>>,
        value: f64,
    ) -> anyhow::Result<Self> {
        let mat = Mat::from_element(rows.len(), cols.len(), value);
        Self::new(mat, rows, cols)
    }

    pub fn nrows(&self) -> usize {
        self.mat.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.mat.ncols()
    }

    pub fn row_labels(&self) -> &[Box<str>] {
        &self.rows
    }

    pub fn col_labels(&self) -> &[Box<str>] {
        &self.cols
    }

    pub fn values(&self) -> &Mat {
        &self.mat
    }

    pub fn row_position(&self, row: &str) -> Option<usize> {
        self.row_index.get(row).copied()
    }

    pub fn get(&self, row: &str, col: &str) -> anyhow::Result<f64> {
        let i = self
            .row_index
            .get(row)
            .ok_or(anyhow::anyhow!("unknown row label: {}", row))?;
        let j = self
            .col_index
            .get(col)
            .ok_or(anyhow::anyhow!("unknown column label: {}", col))?;
        Ok(self.mat[(*i, *j)])
    }

    pub fn set(&mut self, row: &str, col: &str, value: f64) -> anyhow::Result<()> {
        let i = self
            .row_index
            .get(row)
            .ok_or(anyhow::anyhow!("unknown row label: {}", row))?;
        let j = self
            .col_index
            .get(col)
            .ok_or(anyhow::anyhow!("unknown column label: {}", col))?;
        self.mat[(*i, *j)] = value;
        Ok(())
    }

    /// Copy one column out as a plain vector
    pub fn column_vec(&self, j: usize) -> Vec<f64> {
        self.mat.column(j).iter().copied().collect()
    }

    /// Positive entries become 1, everything else 0
    pub fn binarize_inplace(&mut self) {
        self.mat.apply(|x| *x = if *x > 0.0 { 1.0 } else { 0.0 });
    }

    pub fn rename_columns(&mut self, cols: Vec<Box<str>>) -> anyhow::Result<()> {
        if cols.len() != self.mat.ncols() {
            anyhow::bail!("column label count mismatch");
        }
        self.col_index = build_index(&cols)?;
        self.cols = cols;
        Ok(())
    }

    /// Drop rows whose labels do not appear in the reference set
    pub fn match_delete_rows(&mut self, reference: &[Box<str>]) -> anyhow::Result<()> {
        let keep: HashSet<&str> = reference.iter().map(|x| x.as_ref()).collect();
        let kept: Vec<usize> = (0..self.rows.len())
            .filter(|&i| keep.contains(self.rows[i].as_ref()))
            .collect();

        if kept.len() != self.rows.len() {
            let mat = Mat::from_fn(kept.len(), self.mat.ncols(), |i, j| self.mat[(kept[i], j)]);
            let rows: Vec<Box<str>> = kept.iter().map(|&i| self.rows[i].clone()).collect();
            self.row_index = build_index(&rows)?;
            self.rows = rows;
            self.mat = mat;
        }
        Ok(())
    }

    /// Append rows for reference labels this matrix lacks, filled with `fill`
    pub fn match_missing_rows(&mut self, reference: &[Box<str>], fill: f64) -> anyhow::Result<()> {
        let missing: Vec<&Box<str>> = reference
            .iter()
            .filter(|x| !self.row_index.contains_key(x.as_ref()))
            .collect();

        if !missing.is_empty() {
            let old_n = self.mat.nrows();
            let mut mat = Mat::from_element(old_n + missing.len(), self.mat.ncols(), fill);
            mat.view_mut((0, 0), (old_n, self.mat.ncols()))
                .copy_from(&self.mat);
            let mut rows = self.rows.clone();
            rows.extend(missing.into_iter().cloned());
            self.row_index = build_index(&rows)?;
            self.rows = rows;
            self.mat = mat;
        }
        Ok(())
    }

    /// Reorder rows to exactly the reference order. Every reference label
    /// must already be present.
    pub fn match_rows(&mut self, reference: &[Box<str>]) -> anyhow::Result<()> {
        let mut order = Vec::with_capacity(reference.len());
        for label in reference {
            let i = self
                .row_index
                .get(label.as_ref())
                .ok_or(anyhow::anyhow!("row label not found: {}", label))?;
            order.push(*i);
        }
        let mat = Mat::from_fn(order.len(), self.mat.ncols(), |i, j| self.mat[(order[i], j)]);
        let rows = reference.to_vec();
        self.row_index = build_index(&rows)?;
        self.rows = rows;
        self.mat = mat;
        Ok(())
    }

    /// Delete extra rows, add missing ones with `fill` and reorder so the
    /// row universe equals the reference exactly
    pub fn align_rows(&mut self, reference: &[Box<str>], fill: f64) -> anyhow::Result<()> {
        self.match_delete_rows(reference)?;
        self.match_missing_rows(reference, fill)?;
        self.match_rows(reference)
    }

    /// Append the columns of a row-identical matrix
    pub fn col_bind(&mut self, other: &LabeledMatrix) -> anyhow::Result<()> {
        if self.rows != other.rows {
            anyhow::bail!("column binding requires identical row labels");
        }
        let (n, m0, m1) = (self.mat.nrows(), self.mat.ncols(), other.mat.ncols());
        let mut mat = Mat::zeros(n, m0 + m1);
        mat.view_mut((0, 0), (n, m0)).copy_from(&self.mat);
        mat.view_mut((0, m0), (n, m1)).copy_from(&other.mat);
        let mut cols = self.cols.clone();
        cols.extend(other.cols.iter().cloned());
        self.col_index = build_index(&cols)?;
        self.cols = cols;
        self.mat = mat;
        Ok(())
    }

    pub fn is_symmetric(&self, tol: f64) -> bool {
        if self.mat.nrows() != self.mat.ncols() {
            return false;
        }
        for i in 0..self.mat.nrows() {
            for j in (i + 1)..self.mat.ncols() {
                if (self.mat[(i, j)] - self.mat[(j, i)]).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Write the matrix as CSV with a header of column labels; the first
    /// field of each data line is the row label
    pub fn to_csv(&self, file_path: &str) -> anyhow::Result<()> {
        ensure_parent_dir(file_path)?;
        let mut buf = BufWriter::new(std::fs::File::create(file_path)?);

        let header: Vec<&str> = self.cols.iter().map(|x| x.as_ref()).collect();
        writeln!(buf, ",{}", header.join(","))?;

        for (i, row) in self.rows.iter().enumerate() {
            let fields: Vec<String> = (0..self.mat.ncols())
                .map(|j| format!("{}", self.mat[(i, j)]))
                .collect();
            writeln!(buf, "{},{}", row, fields.join(","))?;
        }
        buf.flush()?;
        Ok(())
    }

    /// Read a matrix back from the CSV layout written by [`to_csv`](Self::to_csv)
    pub fn from_csv(file_path: &str) -> anyhow::Result<Self> {
        let buf = open_buf_reader(file_path)?;
        let mut lines = std::io::BufRead::lines(buf);

        let header = lines
            .next()
            .ok_or(anyhow::anyhow!("empty csv file: {}", file_path))??;
        let cols: Vec<Box<str>> = header
            .split(',')
            .skip(1)
            .map(|x| x.trim().into())
            .collect();

        let mut rows = vec![];
        let mut data = vec![];
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split(',');
            let row: Box<str> = fields
                .next()
                .ok_or(anyhow::anyhow!("missing row label"))?
                .trim()
                .into();
            let values: Vec<f64> = fields
                .map(|x| x.trim().parse::<f64>())
                .collect::<Result<_, _>>()?;
            if values.len() != cols.len() {
                anyhow::bail!("row {} has {} fields, expected {}", row, values.len(), cols.len());
            }
            rows.push(row);
            data.push(values);
        }

        let mat = Mat::from_fn(rows.len(), cols.len(), |i, j| data[i][j]);
        Self::new(mat, rows, cols)
    }
}
