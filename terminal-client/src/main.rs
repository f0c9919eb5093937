mod render;

use clap::Parser;
use skin_flow::{AnalysisOutcome, AnalysisRunner, HttpAnalyzer, Step, UploadedImage, Wizard};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "skin-detector", about = "SkinAI Detector - terminal front end")]
struct Args {
    /// Base URL of the detector service
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server_url: String,
}

type Input = Lines<BufReader<Stdin>>;

enum Flow {
    Continue,
    Quit,
}

async fn prompt(input: &mut Input, label: &str) -> anyhow::Result<Option<String>> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(input.next_line().await?.map(|line| line.trim().to_string()))
}

async fn info_view(wizard: &Mutex<Wizard>, input: &mut Input) -> anyhow::Result<Flow> {
    println!("\n== Patient Information ==");
    println!("Please provide your basic information to begin the analysis");

    let Some(name) = prompt(input, "Full Name: ").await? else {
        return Ok(Flow::Quit);
    };
    let Some(age) = prompt(input, "Age: ").await? else {
        return Ok(Flow::Quit);
    };

    if let Err(e) = wizard.lock().await.submit_patient_info(&name, &age) {
        println!("{}", e);
    }
    Ok(Flow::Continue)
}

async fn select_image(wizard: &Mutex<Wizard>, path: &str) -> anyhow::Result<()> {
    match UploadedImage::from_path(path).await {
        Ok(image) => wizard.lock().await.upload_image(image)?,
        Err(e) => println!("Could not load image: {}", e),
    }
    Ok(())
}

async fn upload_view(
    wizard: &Mutex<Wizard>,
    runner: &AnalysisRunner,
    input: &mut Input,
) -> anyhow::Result<Flow> {
    let (patient_line, has_image) = {
        let wizard = wizard.lock().await;
        (render::patient_line(wizard.patient()), wizard.image().is_some())
    };

    println!("\n== Upload Skin Image ==");
    println!("{}", patient_line);

    if !has_image {
        println!("Upload a clear photo of the skin area you want to analyze");
        let Some(path) = prompt(input, "Image path (q to quit): ").await? else {
            return Ok(Flow::Quit);
        };
        match path.as_str() {
            "q" => return Ok(Flow::Quit),
            "" => {}
            path => select_image(wizard, path).await?,
        }
        return Ok(Flow::Continue);
    }

    let Some(choice) = prompt(
        input,
        "[p] Predict skin cancer  [u] Upload again  [q] Quit  (or another image path): ",
    )
    .await?
    else {
        return Ok(Flow::Quit);
    };

    match choice.as_str() {
        "p" => analyze(runner, input).await,
        "u" => {
            wizard.lock().await.upload_again()?;
            Ok(Flow::Continue)
        }
        "q" => Ok(Flow::Quit),
        "" => Ok(Flow::Continue),
        path => {
            select_image(wizard, path).await?;
            Ok(Flow::Continue)
        }
    }
}

/// upload -> predict -> result, or back to upload when the user presses Enter
async fn analyze(runner: &AnalysisRunner, input: &mut Input) -> anyhow::Result<Flow> {
    println!("\n== Analyzing Image ==");
    println!("This may take a few moments. Press Enter to stop the analysis.");

    let analysis = runner.run();
    tokio::pin!(analysis);

    // biased: the analysis must be polled (and the wizard moved to predict)
    // before a stop can be honoured
    tokio::select! {
        biased;
        outcome = &mut analysis => {
            if let AnalysisOutcome::Failed(e) = outcome? {
                warn!(error = %e, "Analysis request failed");
            }
        }
        line = input.next_line() => {
            runner.stop().await?;
            analysis.await?;
            println!("Analysis stopped.");
            if line?.is_none() {
                return Ok(Flow::Quit);
            }
        }
    }
    Ok(Flow::Continue)
}

async fn result_view(wizard: &Mutex<Wizard>, input: &mut Input) -> anyhow::Result<Flow> {
    {
        let wizard = wizard.lock().await;
        if let Some(result) = wizard.result() {
            print!("{}", render::result_view(wizard.patient(), result));
        }
    }

    let Some(choice) = prompt(input, "[u] Upload again  [h] Return home  [q] Quit: ").await? else {
        return Ok(Flow::Quit);
    };

    match choice.as_str() {
        "u" => wizard.lock().await.upload_again()?,
        "h" => wizard.lock().await.return_home()?,
        "q" => return Ok(Flow::Quit),
        _ => {}
    }
    Ok(Flow::Continue)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let wizard = Arc::new(Mutex::new(Wizard::new()));
    let analyzer = Arc::new(HttpAnalyzer::new(&args.server_url));
    let runner = AnalysisRunner::new(wizard.clone(), analyzer);
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    println!("SkinAI Detector - Advanced Skin Cancer Detection System");
    println!("Service: {}", args.server_url);

    loop {
        let step = wizard.lock().await.step();
        let flow = match step {
            Step::Info => info_view(&wizard, &mut input).await?,
            Step::Upload => upload_view(&wizard, &runner, &mut input).await?,
            // only reachable if a previous analysis was interrupted
            Step::Predict => {
                runner.stop().await?;
                Flow::Continue
            }
            Step::Result => result_view(&wizard, &mut input).await?,
        };

        if let Flow::Quit = flow {
            break;
        }
    }

    println!("{}", render::DISCLAIMER);
    Ok(())
}
