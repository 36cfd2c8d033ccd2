use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Kernel – 1-D coefficient vector with a centre offset
// ---------------------------------------------------------------------------

/// Convolution weights addressed by a logical index.
///
/// Logical index `i` maps to `values[i + offset]`, so valid indices run from
/// `-offset` to `size - offset - 1`. Reading outside that range yields `0.0`
/// and writing outside it is ignored.
///
/// The mutating operations work in place and return `&mut Self` for
/// chaining:
///
/// ```
/// use rusty_filters::filters::kernel::Kernel;
///
/// let mut k = Kernel::new(vec![1.0, 3.0, 1.0]);
/// k.add(1.0).normalize();
/// assert_eq!(k.values(), &[0.25, 0.5, 0.25]);
/// assert_eq!(k.get(-1), 0.25);
/// assert_eq!(k.get(2), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kernel {
    values: Vec<f64>,
    offset: i64,
}

impl Kernel {
    /// A kernel centred on its middle element (`offset = size / 2`).
    pub fn new(values: Vec<f64>) -> Self {
        let offset = (values.len() / 2) as i64;
        Kernel { values, offset }
    }

    pub fn with_offset(offset: i64, values: Vec<f64>) -> Self {
        Kernel { values, offset }
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn min_index(&self) -> i64 {
        -self.offset
    }

    pub fn max_index(&self) -> i64 {
        self.size() as i64 - self.offset - 1
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    fn slot(&self, i: i64) -> Option<usize> {
        let slot = i + self.offset;
        (0..self.size() as i64)
            .contains(&slot)
            .then_some(slot as usize)
    }

    pub fn get(&self, i: i64) -> f64 {
        self.slot(i).map_or(0.0, |slot| self.values[slot])
    }

    pub fn set(&mut self, i: i64, value: f64) {
        if let Some(slot) = self.slot(i) {
            self.values[slot] = value;
        }
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn add(&mut self, v: f64) -> &mut Self {
        self.values.iter_mut().for_each(|x| *x += v);
        self
    }

    pub fn mul(&mut self, v: f64) -> &mut Self {
        self.values.iter_mut().for_each(|x| *x *= v);
        self
    }

    /// Element-wise sum with `other` over the index range of the smaller kernel.
    ///
    /// Coefficients of `self` outside that range are left as they are, so
    /// `a.add_kernel(&b)` and `b.add_kernel(&a)` may differ when the sizes do.
    pub fn add_kernel(&mut self, other: &Kernel) -> &mut Self {
        self.combine(other, |a, b| a + b)
    }

    /// Element-wise product with `other` over the index range of the smaller
    /// kernel. Same range rule as [`Kernel::add_kernel`]: when `self` is the
    /// larger kernel its coefficients outside `other`'s range are not zeroed.
    pub fn mul_kernel(&mut self, other: &Kernel) -> &mut Self {
        self.combine(other, |a, b| a * b)
    }

    fn combine(&mut self, other: &Kernel, op: impl Fn(f64, f64) -> f64) -> &mut Self {
        let (min, max) = if self.size() <= other.size() {
            (self.min_index(), self.max_index())
        } else {
            (other.min_index(), other.max_index())
        };
        for i in min..=max {
            let v = op(self.get(i), other.get(i));
            self.set(i, v);
        }
        self
    }

    /// Scale the coefficients so they sum to one.
    ///
    /// A kernel summing to zero ends up with infinite or NaN coefficients;
    /// callers that build such kernels must not normalize them.
    pub fn normalize(&mut self) -> &mut Self {
        let sum = self.sum();
        self.values.iter_mut().for_each(|x| *x /= sum);
        self
    }

    pub fn negate(&mut self) -> &mut Self {
        self.mul(-1.0)
    }

    /// A normalized copy, leaving `self` untouched.
    pub fn normalized(&self) -> Kernel {
        let mut k = self.clone();
        k.normalize();
        k
    }

    /// A negated copy, leaving `self` untouched.
    pub fn negated(&self) -> Kernel {
        let mut k = self.clone();
        k.negate();
        k
    }
}
