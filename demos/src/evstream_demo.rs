use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::{Ok, Result};
use evstream::reader::{JsonReader, ReadOutcome};
use evstream::source::{AsyncBufReaderCharSource, BufReaderCharSource, PushCharSource};
use tokio::{io::AsyncReadExt, sync::mpsc};

pub async fn bench_bufreader(path: &PathBuf) -> Result<u64> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    let reader = BufReader::new(file);

    let source = BufReaderCharSource::new(reader);
    let mut json_reader = JsonReader::new(source);
    loop {
        match json_reader.next()? {
            ReadOutcome::Event(_) => {}
            ReadOutcome::Eof => break,
            ReadOutcome::NeedMoreInput => json_reader.source.fill_buf()?,
        }
    }

    Ok(len)
}

pub async fn bench_tokio(path: &PathBuf) -> Result<u64> {
    let file = tokio::fs::File::open(path).await?;
    let len = file.metadata().await?.len();
    let reader = tokio::io::BufReader::new(file);

    let source = AsyncBufReaderCharSource::new(reader);
    let mut json_reader = JsonReader::new(source);
    loop {
        match json_reader.next()? {
            ReadOutcome::Event(_) => {}
            ReadOutcome::Eof => break,
            ReadOutcome::NeedMoreInput => json_reader.source.fill_buf().await?,
        }
    }

    Ok(len)
}

pub async fn tokio_twotasks(path: &PathBuf) -> Result<u64> {
    let (tx, mut rx) = mpsc::channel(1);

    let mut file = tokio::fs::File::open(path).await?;
    let len = file.metadata().await?.len();

    let reader_task = tokio::spawn(async move {
        loop {
            let mut buf = vec![0; 65 * 1024];
            let r = file.read(&mut buf).await?;
            if r == 0 {
                break;
            }
            buf.truncate(r);
            tx.send(buf).await?;
        }

        Ok(())
    });

    let parser_task = tokio::spawn(async move {
        let source = PushCharSource::new();
        let mut json_reader = JsonReader::new(source);
        let mut i = 0;
        let mut buf = Vec::new();
        loop {
            match json_reader.next()? {
                ReadOutcome::Event(_) => {}
                ReadOutcome::Eof => break,
                ReadOutcome::NeedMoreInput => {
                    i += json_reader.source.push_bytes(&buf[i..]);
                    if i == buf.len() {
                        if let Some(b) = rx.recv().await {
                            buf = b;
                            i = 0;
                        } else {
                            json_reader.source.done();
                        }
                    }
                }
            }
        }

        Ok(())
    });

    reader_task.await??;
    parser_task.await??;

    Ok(len)
}
