//! Utilities.
use anyhow::Result;
use candle_core::{Device, Tensor};
use deepq_core::error::DqnError;

/// Stacks rows of equal length into a `(rows, cols)` tensor.
pub(crate) fn rows_to_tensor(rows: &[Vec<f32>], device: &Device) -> Result<Tensor> {
    let cols = rows.first().map(|r| r.len()).unwrap_or(0);
    if let Some(row) = rows.iter().find(|r| r.len() != cols) {
        return Err(DqnError::ShapeMismatch(format!(
            "row of length {} in a batch of width {}",
            row.len(),
            cols
        ))
        .into());
    }
    let data = rows.iter().flatten().copied().collect::<Vec<_>>();
    Ok(Tensor::from_vec(data, (rows.len(), cols), device)?)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rows_to_tensor() -> Result<()> {
        let t = rows_to_tensor(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]], &Device::Cpu)?;
        assert_eq!(t.dims(), &[3, 2]);
        assert_eq!(t.to_vec2::<f32>()?[2], vec![5.0, 6.0]);
        assert!(rows_to_tensor(&[vec![1.0], vec![1.0, 2.0]], &Device::Cpu).is_err());
        Ok(())
    }
}
