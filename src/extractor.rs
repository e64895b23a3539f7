use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;

use image::RgbaImage;

use crate::{
    error::{ExtractError, Result},
    options::Options,
    Color, Palette, PaletteBuilder,
};

/// A unit of work handed to an [`Executor`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// The execution context a completion callback should run on.
///
/// The extractor calls [`Executor::execute`] from its worker thread once a result is ready. What happens next is up
/// to the implementation: run the task right away ([`Inline`]), or queue it for another thread. A
/// `std::sync::mpsc::Sender<Task>` is an executor that queues tasks for whichever thread owns the receiving end.
pub trait Executor: Send + 'static {
    fn execute(&self, task: Task);
}

/// Runs callbacks directly on the extractor's worker thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl Executor for Inline {
    fn execute(&self, task: Task) {
        task();
    }
}

impl Executor for mpsc::Sender<Task> {
    fn execute(&self, task: Task) {
        if self.send(task).is_err() {
            log::warn!("callback receiver is gone, dropping extraction result");
        }
    }
}

enum WorkerMessage {
    Exit,
    Run(Task),
}

/// Runs extractions on a dedicated worker thread.
///
/// Requests submitted to one extractor run one at a time in submission order. Separate extractors have separate
/// workers and run in parallel. Dropping the extractor finishes every request already submitted, then stops the
/// worker.
#[derive(Debug)]
pub struct Extractor {
    thread_handle: Option<thread::JoinHandle<()>>,
    tx: mpsc::Sender<WorkerMessage>,
}

/// The pending result of one extraction request.
#[derive(Debug)]
pub struct Extraction<T> {
    rx: mpsc::Receiver<Result<T>>,
}

impl Extractor {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<WorkerMessage>();
        let thread_handle = thread::spawn(move || Self::worker_loop(rx));

        Self {
            thread_handle: Some(thread_handle),
            tx,
        }
    }

    fn worker_loop(rx: mpsc::Receiver<WorkerMessage>) {
        log::trace!("extraction worker started");

        while let Ok(message) = rx.recv() {
            match message {
                WorkerMessage::Exit => break,
                WorkerMessage::Run(task) => {
                    // a panicking request drops its result sender, its handle reports a disconnect
                    if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
                        log::error!("extraction request panicked");
                    }
                }
            }
        }

        log::trace!("extraction worker stopped");
    }

    fn submit<T, F>(&self, job: F) -> Extraction<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (result_tx, result_rx) = mpsc::sync_channel(1);
        let task: Task = Box::new(move || {
            // the caller may have dropped the handle, nobody is waiting then
            let _ = result_tx.send(job());
        });

        if self.tx.send(WorkerMessage::Run(task)).is_err() {
            log::warn!("extraction worker is gone, request dropped");
        }

        Extraction { rx: result_rx }
    }

    /// Run a fully configured [`PaletteBuilder`] on the worker.
    pub fn extract_palette(&self, builder: PaletteBuilder) -> Extraction<Palette> {
        self.submit(move || builder.generate())
    }

    pub fn extract_colors(
        &self,
        image: RgbaImage,
        options: Options,
        avoid_colors: Vec<Color>,
    ) -> Extraction<Vec<Color>> {
        self.submit(move || generate_colors(image, options, avoid_colors))
    }

    /// The first color of a default extraction. Fails with [`ExtractError::NoColorFound`] when nothing survives the
    /// filters, for example on an image with no bright pixels.
    pub fn extract_main_color(&self, image: RgbaImage) -> Extraction<Color> {
        self.submit(move || {
            Palette::from_image(image)
                .generate()?
                .main_color()
                .ok_or(ExtractError::NoColorFound)
        })
    }

    pub fn extract_bright_colors(&self, image: RgbaImage) -> Extraction<Vec<Color>> {
        self.extract_colors(image, Options::BRIGHT_COLORS, Vec::new())
    }

    pub fn extract_dark_colors(&self, image: RgbaImage) -> Extraction<Vec<Color>> {
        self.extract_colors(image, Options::DARK_COLORS, Vec::new())
    }

    /// Extract colors from several images as one request. The results are in the same order as the images.
    pub fn extract_batch(&self, images: Vec<RgbaImage>, options: Options) -> Extraction<Vec<Vec<Color>>> {
        self.submit(move || {
            images
                .into_iter()
                .map(|image| generate_colors(image, options, Vec::new()))
                .collect()
        })
    }

    /// Like [`Extractor::extract_colors`], but hands the result to `callback` through `executor` instead of
    /// returning a handle.
    pub fn extract_colors_with<E, F>(
        &self,
        image: RgbaImage,
        options: Options,
        avoid_colors: Vec<Color>,
        executor: E,
        callback: F,
    ) where
        E: Executor,
        F: FnOnce(Result<Vec<Color>>) + Send + 'static,
    {
        let task: Task = Box::new(move || {
            let result = generate_colors(image, options, avoid_colors);
            executor.execute(Box::new(move || callback(result)));
        });

        if self.tx.send(WorkerMessage::Run(task)).is_err() {
            log::warn!("extraction worker is gone, request dropped");
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Extractor {
    fn drop(&mut self) {
        // queued requests are ahead of the exit message, so they still run
        let _ = self.tx.send(WorkerMessage::Exit);

        if let Some(thread_handle) = self.thread_handle.take() {
            if thread_handle.join().is_err() {
                log::error!("extraction worker panicked");
            }
        }
    }
}

impl<T> Extraction<T> {
    /// Block until the result is ready.
    pub fn wait(self) -> Result<T> {
        self.rx.recv().map_err(|_| ExtractError::WorkerDisconnected)?
    }

    /// The result if it is ready, without blocking. Once a result has been returned, later calls report
    /// [`ExtractError::WorkerDisconnected`].
    pub fn try_result(&self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(ExtractError::WorkerDisconnected)),
        }
    }
}

fn generate_colors(image: RgbaImage, options: Options, avoid_colors: Vec<Color>) -> Result<Vec<Color>> {
    Palette::from_image(image)
        .options(options)
        .avoid_colors(avoid_colors)
        .generate()
        .map(Palette::into_colors)
}
