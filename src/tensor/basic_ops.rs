use crate::tensor::Tensor;

// approximate: accumulation order differs between execution modes
impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        let epsilon = 1e-3;
        if self.shape != other.shape {
            return false;
        }

        self.data.iter()
            .zip(&other.data)
            .all(|(a, b)| (a - b).abs() <= epsilon * (1.0 + a.abs().max(b.abs())))
    }
}
