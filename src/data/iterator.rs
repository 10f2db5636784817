// ============================================================
// Layer 4 — Record Reader Data-Set Iterator
// ============================================================
// Pulls records from a RecordReader, checks their labels, and
// hands each chunk of `batch_size` records to a burn Batcher that
// stacks them into tensors on the training device:
//
//   features: [rows, num_features]
//   targets:  [rows, 1]            num_labels == 1 (regression)
//             [rows, num_labels]   num_labels  > 1 (one-hot)
//   classes:  [rows]  Int          num_labels  > 1
//
// With num_labels == 0 the batches carry features only, which is
// what unsupervised single-layer fitting consumes.
//
// Label checks happen before batching because Batcher::batch
// cannot fail. For two classes a label of -1 is read as class 0,
// the usual SVMLight binary convention.
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::domain::error::{Result, TrainError};
use crate::domain::record::Record;
use crate::domain::traits::RecordReader;

// ─── DataSetBatch ─────────────────────────────────────────────────────────────
/// One mini-batch, already on the device the model trains on.
#[derive(Debug, Clone)]
pub struct DataSetBatch<B: Backend> {
    /// Feature rows — shape: [rows, num_features]
    pub features: Tensor<B, 2>,

    /// Float targets for MSE-style losses; `None` for unlabeled batches
    pub targets: Option<Tensor<B, 2>>,

    /// Class index per row for classification losses — shape: [rows]
    pub classes: Option<Tensor<B, 1, Int>>,

    /// Number of records stacked into this batch
    pub rows: usize,
}

// ─── DataSetBatcher ───────────────────────────────────────────────────────────
/// Stacks checked records into a `DataSetBatch`.
///
/// Expects every record to have the same width and, when `num_labels`
/// is above one, a label that is already a valid class index.
#[derive(Clone, Debug)]
pub struct DataSetBatcher<B: Backend> {
    device:     B::Device,
    num_labels: usize,
}

impl<B: Backend> DataSetBatcher<B> {
    pub fn new(device: B::Device, num_labels: usize) -> Self {
        Self { device, num_labels }
    }
}

impl<B: Backend> Batcher<Record, DataSetBatch<B>> for DataSetBatcher<B> {
    fn batch(&self, items: Vec<Record>) -> DataSetBatch<B> {
        let rows  = items.len();
        let width = items.first().map_or(0, Record::width);

        let flat: Vec<f32> = items.iter().flat_map(|r| r.features.iter().copied()).collect();
        let features = Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device).reshape([rows, width]);

        let labels = || items.iter().map(|r| r.label.unwrap_or_default());

        let (targets, classes) = match self.num_labels {
            0 => (None, None),
            1 => {
                let values: Vec<f32> = labels().map(|l| l as f32).collect();
                let targets = Tensor::<B, 1>::from_floats(values.as_slice(), &self.device).reshape([rows, 1]);
                (Some(targets), None)
            }
            n => {
                let class_ids: Vec<i32> = labels().map(|l| l as i32).collect();

                let mut one_hot = vec![0.0f32; rows * n];
                for (row, &class) in class_ids.iter().enumerate() {
                    one_hot[row * n + class as usize] = 1.0;
                }

                let targets = Tensor::<B, 1>::from_floats(one_hot.as_slice(), &self.device).reshape([rows, n]);
                let classes = Tensor::<B, 1, Int>::from_ints(class_ids.as_slice(), &self.device);
                (Some(targets), Some(classes))
            }
        };

        DataSetBatch { features, targets, classes, rows }
    }
}

// ─── RecordReaderDataSetIterator ──────────────────────────────────────────────
/// Iterator of mini-batches over a record reader.
///
/// Yields `Err` once, on the first read or label error, then stops.
/// The final batch may be shorter than `batch_size`.
pub struct RecordReaderDataSetIterator<B: Backend> {
    reader:     Box<dyn RecordReader>,
    batch_size: usize,
    num_labels: usize,
    batcher:    DataSetBatcher<B>,
    exhausted:  bool,
}

impl<B: Backend> RecordReaderDataSetIterator<B> {
    pub fn new(
        reader:     Box<dyn RecordReader>,
        batch_size: usize,
        num_labels: usize,
        device:     B::Device,
    ) -> Self {
        Self {
            reader,
            // A zero batch size would never make progress
            batch_size: batch_size.max(1),
            num_labels,
            batcher: DataSetBatcher::new(device, num_labels),
            exhausted: false,
        }
    }

    /// Feature-only iterator, as used when fitting a single layer.
    pub fn unlabeled(reader: Box<dyn RecordReader>, batch_size: usize, device: B::Device) -> Self {
        Self::new(reader, batch_size, 0, device)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn next_chunk(&mut self) -> Result<Option<Vec<Record>>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut records = Vec::with_capacity(self.batch_size);
        while records.len() < self.batch_size {
            match self.reader.next_record()? {
                Some(record) => records.push(self.check_label(record)?),
                None => {
                    self.exhausted = true;
                    break;
                }
            }
        }

        Ok((!records.is_empty()).then_some(records))
    }

    /// Make the label fit the batcher: present when labels are wanted,
    /// and a class index in `0..num_labels` for classification.
    fn check_label(&self, mut record: Record) -> Result<Record> {
        if self.num_labels == 0 {
            return Ok(record);
        }

        let label = record
            .label
            .ok_or(TrainError::MissingLabel { num_labels: self.num_labels })?;
        if self.num_labels > 1 {
            record.label = Some(class_index(label, self.num_labels)?);
        }
        Ok(record)
    }
}

fn class_index(label: f64, num_labels: usize) -> Result<f64> {
    let class = if num_labels == 2 && label == -1.0 { 0.0 } else { label };
    if class < 0.0 || class.fract() != 0.0 || class >= num_labels as f64 {
        return Err(TrainError::LabelOutOfRange { label, num_labels });
    }
    Ok(class)
}

impl<B: Backend> Iterator for RecordReaderDataSetIterator<B> {
    type Item = Result<DataSetBatch<B>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_chunk() {
            Ok(Some(records)) => Some(Ok(self.batcher.batch(records))),
            Ok(None)          => None,
            Err(e) => {
                // Stop after the first error instead of re-reading a broken source
                self.exhausted = true;
                Some(Err(e))
            }
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type B = NdArray;

    struct VecReader(std::vec::IntoIter<Record>);

    impl RecordReader for VecReader {
        fn next_record(&mut self) -> Result<Option<Record>> {
            Ok(self.0.next())
        }
    }

    fn reader(records: Vec<Record>) -> Box<dyn RecordReader> {
        Box::new(VecReader(records.into_iter()))
    }

    fn rec(features: &[f32], label: f64) -> Record {
        Record::new(features.to_vec(), Some(label))
    }

    fn iter(records: Vec<Record>, batch_size: usize, num_labels: usize) -> RecordReaderDataSetIterator<B> {
        RecordReaderDataSetIterator::new(reader(records), batch_size, num_labels, Default::default())
    }

    fn floats<const D: usize>(t: Tensor<B, D>) -> Vec<f32> {
        t.into_data().iter::<f32>().collect()
    }

    #[test]
    fn test_batches_with_short_tail() {
        let records = (0..5).map(|i| rec(&[i as f32, 0.0], 0.0)).collect();
        let batches: Vec<DataSetBatch<B>> = RecordReaderDataSetIterator::unlabeled(
            reader(records),
            2,
            Default::default(),
        )
        .map(|b| b.unwrap())
        .collect();

        assert_eq!(batches.iter().map(|b| b.rows).collect::<Vec<_>>(), vec![2, 2, 1]);
        assert!(batches[0].targets.is_none());
        assert!(batches[0].classes.is_none());
        assert_eq!(batches[0].features.dims(), [2, 2]);
        assert_eq!(floats(batches[2].features.clone()), vec![4.0, 0.0]);
    }

    #[test]
    fn test_one_hot_targets_and_class_indices() {
        let mut it = iter(vec![rec(&[1.0], 2.0), rec(&[2.0], 0.0)], 10, 3);

        let batch = it.next().unwrap().unwrap();
        assert_eq!(batch.targets.clone().unwrap().dims(), [2, 3]);
        assert_eq!(floats(batch.targets.unwrap()), vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        let classes: Vec<i64> = batch.classes.unwrap().into_data().iter::<i64>().collect();
        assert_eq!(classes, vec![2, 0]);
        assert!(it.next().is_none());
    }

    #[test]
    fn test_binary_minus_one_maps_to_first_class() {
        let mut it = iter(vec![rec(&[1.0], -1.0), rec(&[1.0], 1.0)], 2, 2);
        let batch  = it.next().unwrap().unwrap();
        assert_eq!(floats(batch.targets.unwrap()), vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_label_out_of_range_stops_iteration() {
        let mut it = iter(vec![rec(&[1.0], 3.0), rec(&[1.0], 0.0)], 1, 3);
        assert!(matches!(
            it.next().unwrap().unwrap_err(),
            TrainError::LabelOutOfRange { .. }
        ));
        assert!(it.next().is_none());
    }

    #[test]
    fn test_missing_label_when_labels_requested() {
        let mut it = iter(vec![Record::new(vec![0.5], None)], 1, 2);
        assert!(matches!(
            it.next().unwrap().unwrap_err(),
            TrainError::MissingLabel { num_labels: 2 }
        ));
    }

    #[test]
    fn test_regression_target() {
        let batch = iter(vec![rec(&[1.0], 0.75)], 1, 1).next().unwrap().unwrap();
        assert_eq!(batch.targets.clone().unwrap().dims(), [1, 1]);
        assert_eq!(floats(batch.targets.unwrap()), vec![0.75]);
        assert!(batch.classes.is_none());
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(iter(Vec::new(), 4, 0).next().is_none());
    }
}
