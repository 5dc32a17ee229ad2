// src/menu.rs

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::data_analysis::signal_ops::{mean_along_axis, validate_channel};
use crate::data_input::matrix::{FlattenOutcome, MatData};
use crate::data_input::tabular::Table;
use crate::error::{ExplorerError, Result};
use crate::plot_functions::plot_bar_chart::plot_bar_chart;
use crate::plot_functions::plot_matrix_overview::plot_matrix_overview;
use crate::plot_functions::plot_noise_comparison::{plot_noise_comparison, ChannelSelection};
use crate::plot_functions::plot_scatter::plot_scatter;

pub const MENU_TEXT: &str = "
    MAIN MENU
    1. Load CSV file
    2. Load MAT file
    3. Bar chart (CSV)
    4. Scatter plot (CSV)
    5. Show available matrices (MAT)
    6. Plot matrix overview (MAT)
    7. Plot matrix with noise (MAT)
    8. Count and drop NaN rows (CSV)
    9. Multiply two columns and save (CSV)
    10. Show columns (CSV)
    11. Reduce matrix to 2D by averaging (MAT)
    12. Flatten matrix to 2D (MAT)
    13. Exit
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    LoadCsv,
    LoadMat,
    BarChart,
    ScatterPlot,
    ShowMatrices,
    PlotOverview,
    PlotNoise,
    AuditNan,
    MultiplyColumns,
    ShowColumns,
    ReduceMatrix,
    FlattenMatrix,
    Exit,
}

impl MenuOption {
    pub fn parse(choice: &str) -> Option<MenuOption> {
        let option = match choice.trim() {
            "1" => MenuOption::LoadCsv,
            "2" => MenuOption::LoadMat,
            "3" => MenuOption::BarChart,
            "4" => MenuOption::ScatterPlot,
            "5" => MenuOption::ShowMatrices,
            "6" => MenuOption::PlotOverview,
            "7" => MenuOption::PlotNoise,
            "8" => MenuOption::AuditNan,
            "9" => MenuOption::MultiplyColumns,
            "10" => MenuOption::ShowColumns,
            "11" => MenuOption::ReduceMatrix,
            "12" => MenuOption::FlattenMatrix,
            "13" => MenuOption::Exit,
            _ => return None,
        };
        Some(option)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Interactive session state: the loaded files plus the I/O pair the menu
/// talks through.
pub struct Session<R: BufRead, W: Write> {
    input: R,
    output: W,
    config: AppConfig,
    table: Option<Table>,
    mat: Option<MatData>,
    rng: StdRng,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, config: AppConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Session {
            input,
            output,
            config,
            table: None,
            mat: None,
            rng,
        }
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn mat(&self) -> Option<&MatData> {
        self.mat.as_ref()
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the menu until the user exits or the input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.output, "{MENU_TEXT}")?;
            let choice = match self.prompt("Select an option: ") {
                Ok(choice) => choice,
                Err(ExplorerError::InputClosed) => break,
                Err(e) => return Err(e),
            };

            let result = match MenuOption::parse(&choice) {
                Some(option) => self.dispatch(option),
                None => Err(ExplorerError::InvalidOption),
            };
            match result {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(ExplorerError::InputClosed) => break,
                Err(e) => {
                    debug!("Menu action failed: {e:?}");
                    writeln!(self.output, "Error: {e}")?;
                }
            }
        }
        info!("Session finished");
        Ok(())
    }

    fn dispatch(&mut self, option: MenuOption) -> Result<Flow> {
        match option {
            MenuOption::LoadCsv => self.load_csv()?,
            MenuOption::LoadMat => self.load_mat()?,
            MenuOption::BarChart => self.plot_table(true)?,
            MenuOption::ScatterPlot => self.plot_table(false)?,
            MenuOption::ShowMatrices => self.show_matrices()?,
            MenuOption::PlotOverview => self.plot_overview()?,
            MenuOption::PlotNoise => self.plot_noise()?,
            MenuOption::AuditNan => self.audit_nan()?,
            MenuOption::MultiplyColumns => self.multiply_columns()?,
            MenuOption::ShowColumns => self.show_columns()?,
            MenuOption::ReduceMatrix => self.reduce_matrix()?,
            MenuOption::FlattenMatrix => self.flatten_matrix()?,
            MenuOption::Exit => {
                writeln!(self.output, "Exiting the program...")?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ExplorerError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Lists `files` and asks until a valid number is entered.
    fn choose_file(&mut self, files: &[PathBuf], kind: &str) -> Result<PathBuf> {
        if files.is_empty() {
            return Err(ExplorerError::InvalidOption);
        }
        writeln!(self.output, "\nSelect a {kind} from the list:")?;
        for (idx, file) in files.iter().enumerate() {
            writeln!(self.output, "{}. {}", idx + 1, file.display())?;
        }
        loop {
            let answer = self.prompt(&format!("Enter the number of the {kind} to load: "))?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=files.len()).contains(&n) => return Ok(files[n - 1].clone()),
                _ => writeln!(self.output, "Invalid option, please enter a valid number.")?,
            }
        }
    }

    fn load_csv(&mut self) -> Result<()> {
        let files = self.config.csv_files.clone();
        let path = self.choose_file(&files, "CSV file")?;
        self.table = None;
        let table = Table::load(&path)?;
        writeln!(self.output, "File {} loaded successfully.", path.display())?;
        self.table = Some(table);
        Ok(())
    }

    fn load_mat(&mut self) -> Result<()> {
        let files = self.config.mat_files.clone();
        let path = self.choose_file(&files, "MAT file")?;
        self.mat = None;
        let mat = MatData::load(&path)?;
        writeln!(self.output, "File {} loaded successfully.", path.display())?;
        self.mat = Some(mat);
        Ok(())
    }

    fn require_table(&self) -> Result<&Table> {
        self.table.as_ref().ok_or(ExplorerError::NotLoaded("CSV"))
    }

    fn require_mat(&self) -> Result<&MatData> {
        self.mat.as_ref().ok_or(ExplorerError::NotLoaded("MAT"))
    }

    fn write_columns(&mut self) -> Result<()> {
        let columns = self.require_table()?.columns().to_vec();
        writeln!(self.output, "Available columns: {columns:?}")?;
        Ok(())
    }

    fn plot_table(&mut self, bar: bool) -> Result<()> {
        self.write_columns()?;
        let x = self.prompt("Enter the column for the X axis: ")?;
        let y = self.prompt("Enter the column for the Y axis: ")?;
        let table = self.require_table()?;
        table.require_columns(&x, &y)?;
        let root = root_name(&table.source);
        let output_dir = self.config.output_dir.clone();
        let path = if bar {
            plot_bar_chart(table, &x, &y, &output_dir, &root)?
        } else {
            plot_scatter(table, &x, &y, &output_dir, &root)?
        };
        writeln!(self.output, "Plot saved to {}", path.display())?;
        Ok(())
    }

    fn show_columns(&mut self) -> Result<()> {
        self.write_columns()?;
        let preview = self.require_table()?.preview(5);
        writeln!(self.output, "{preview}")?;
        Ok(())
    }

    fn audit_nan(&mut self) -> Result<()> {
        let table = self.table.as_mut().ok_or(ExplorerError::NotLoaded("CSV"))?;
        let report = table.audit_and_clean();
        writeln!(self.output, "{report}")?;
        Ok(())
    }

    fn multiply_columns(&mut self) -> Result<()> {
        self.write_columns()?;
        let col1 = self.prompt("Enter the first column to multiply: ")?;
        let col2 = self.prompt("Enter the second column to multiply: ")?;
        let file_name = self.prompt("Enter the name of the new CSV file: ")?;
        let table = self.table.as_mut().ok_or(ExplorerError::NotLoaded("CSV"))?;
        let path = table.multiply_columns_and_save(&col1, &col2, &file_name)?;
        writeln!(self.output, "New CSV file created: {}", path.display())?;
        Ok(())
    }

    fn show_matrices(&mut self) -> Result<()> {
        let summaries = self.require_mat()?.summaries();
        if summaries.is_empty() {
            writeln!(self.output, "No matrices available.")?;
            return Ok(());
        }
        writeln!(self.output, "Available matrices:")?;
        for (name, shape) in summaries {
            writeln!(self.output, "- {name} {shape:?}")?;
        }
        Ok(())
    }

    /// Asks for a matrix name; an empty answer picks the first matrix.
    fn choose_matrix(&mut self) -> Result<String> {
        let first = self.require_mat()?.first_matrix_name()?;
        let answer = self.prompt(&format!("Matrix to use [{first}]: "))?;
        Ok(if answer.is_empty() { first } else { answer })
    }

    fn plot_overview(&mut self) -> Result<()> {
        let name = self.choose_matrix()?;
        let mat = self.require_mat()?;
        let matrix = mat.get_signal_matrix(&name)?;
        let root = root_name(&mat.source);
        let path = plot_matrix_overview(
            &name,
            &matrix,
            &self.config.signal,
            &self.config.output_dir,
            &root,
        )?;
        writeln!(self.output, "Plot saved to {}", path.display())?;
        Ok(())
    }

    fn ask_channel(&mut self, message: &str, n_channels: usize) -> Result<i64> {
        let answer = self.prompt(&format!("{message} (0 to {}): ", n_channels.saturating_sub(1)))?;
        answer
            .parse::<i64>()
            .map_err(|_| ExplorerError::InvalidNumber(answer))
    }

    fn plot_noise(&mut self) -> Result<()> {
        let name = self.choose_matrix()?;
        let matrix = self.require_mat()?.get_signal_matrix(&name)?;
        let n_channels = matrix.dim().0;

        let first = self.ask_channel("Enter the number of channel 1", n_channels)?;
        let second = self.ask_channel("Enter the number of channel 2", n_channels)?;
        let noisy = self.ask_channel("Enter the number of the channel to add noise to", n_channels)?;
        let selection = ChannelSelection {
            first: validate_channel(first, n_channels)?,
            second: validate_channel(second, n_channels)?,
            noisy: validate_channel(noisy, n_channels)?,
        };

        let root = root_name(&self.require_mat()?.source);
        let path = plot_noise_comparison(
            &name,
            &matrix,
            selection,
            self.config.signal.noise_std_dev,
            &mut self.rng,
            &self.config.output_dir,
            &root,
        )?;
        writeln!(self.output, "Plot saved to {}", path.display())?;
        Ok(())
    }

    fn reduce_matrix(&mut self) -> Result<()> {
        let name = self.choose_matrix()?;
        let matrix = self.require_mat()?.get_signal_matrix(&name)?;
        let answer = self.prompt("Axis to average over (0 channels, 1 samples, 2 epochs): ")?;
        let axis = answer
            .parse::<usize>()
            .map_err(|_| ExplorerError::InvalidNumber(answer))?;
        let reduced = mean_along_axis(&matrix, axis)?;
        let (rows, cols) = reduced.dim();
        writeln!(
            self.output,
            "Matrix '{name}' averaged over axis {axis}: {:?} -> ({rows}, {cols})",
            matrix.shape()
        )?;
        for row in reduced.outer_iter().take(5) {
            let values: Vec<String> = row.iter().take(8).map(|v| format!("{v:.3}")).collect();
            let more = if cols > 8 { " ..." } else { "" };
            writeln!(self.output, "  [{}{more}]", values.join(", "))?;
        }
        if rows > 5 {
            writeln!(self.output, "  ... ({} more rows)", rows - 5)?;
        }
        Ok(())
    }

    fn flatten_matrix(&mut self) -> Result<()> {
        let name = self.choose_matrix()?;
        let mat = self.mat.as_mut().ok_or(ExplorerError::NotLoaded("MAT"))?;
        match mat.flatten_to_2d(&name)? {
            FlattenOutcome::Flattened { from, to } => writeln!(
                self.output,
                "Matrix '{name}' flattened to 2D: {from:?} -> ({}, {}).",
                to.0, to.1
            )?,
            FlattenOutcome::AlreadyTwoDimensional => {
                writeln!(self.output, "Matrix '{name}' is already 2D.")?
            }
        }
        Ok(())
    }
}

/// File stem used to name the rendered images.
fn root_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "data".to_string())
}
